//! List field descriptor
//!
//! A `ListField` is the schema declaration of one list-valued configuration
//! attribute. It owns the item type, the length bounds and the user
//! predicates, and it is the only way values enter a field:
//!
//! - `set` builds a fresh container from a raw value, validating every item,
//!   and appends one record to the field's ledger on the owner
//! - `validate` checks the length bounds and the whole-list predicate; for
//!   nested fields it also validates every element against its per-index
//!   descriptor
//!
//! Per-item checks run at mutation time only; `validate` does not repeat them.
//!
//! Descriptors are cheap to clone: the declaration lives behind an `Arc` and
//! every container keeps a clone of the descriptor it is bound to.

use crate::list::List;
use crate::nested::NestedListMut;
use crate::options::{Check, ListFieldOptions};
use crate::owner::{FieldOwner, ListValue, Scope};
use crate::sequence::{ListMut, Sequence};
use fieldtrail_core::{
    CallSite, Error, ItemType, Origin, ProvenanceRecord, Result, SchemaError, ValidationKind,
    Value,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

struct Declaration {
    name: String,
    doc: String,
    item_type: ItemType,
    default: Option<Value>,
    optional: bool,
    length: Option<usize>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    item_check: Option<Check>,
    list_check: Option<Check>,
    source: CallSite,
    // Template for per-index element descriptors; `Some` for nested fields
    element: Option<ListField>,
}

/// Schema declaration of a list-valued field
#[derive(Clone)]
pub struct ListField {
    decl: Arc<Declaration>,
}

impl ListField {
    /// Declare a flat list field.
    ///
    /// # Errors
    ///
    /// `SchemaError` if `dtype` is missing, `length` or `max_length` is not
    /// positive, or `min_length > max_length`.
    #[track_caller]
    pub fn new(
        name: impl Into<String>,
        options: ListFieldOptions,
    ) -> std::result::Result<Self, SchemaError> {
        let source = CallSite::here();
        Self::declare(name.into(), options, source, None)
    }

    /// Declare a nested list field: a list whose elements are lists of
    /// `dtype`. `options.subfield` constrains each element.
    #[track_caller]
    pub fn nested(
        name: impl Into<String>,
        mut options: ListFieldOptions,
    ) -> std::result::Result<Self, SchemaError> {
        let source = CallSite::here();
        let name = name.into();
        if options.dtype.is_none() {
            return Err(SchemaError::MissingItemType(name));
        }
        let mut sub = options.subfield.take().map(|s| *s).unwrap_or_default();
        sub.dtype = options.dtype;
        sub.doc = format!("element of {}", name);
        // Built once here so bad sub-constraints fail at declaration time
        let template = Self::declare(format!("{}[]", name), sub, source.clone(), None)?;
        Self::declare(name, options, source, Some(template))
    }

    fn declare(
        name: String,
        options: ListFieldOptions,
        source: CallSite,
        element: Option<ListField>,
    ) -> std::result::Result<Self, SchemaError> {
        let item_type = options
            .dtype
            .ok_or_else(|| SchemaError::MissingItemType(name.clone()))?;

        let (length, min_length, max_length) = match options.length {
            Some(length) if length <= 0 => return Err(SchemaError::NonPositiveLength(length)),
            Some(length) => (Some(length as usize), None, None),
            None => {
                if let Some(max) = options.max_length {
                    if max <= 0 {
                        return Err(SchemaError::NonPositiveMaxLength(max));
                    }
                }
                if let (Some(min), Some(max)) = (options.min_length, options.max_length) {
                    if min > max {
                        return Err(SchemaError::MinExceedsMax { min, max });
                    }
                }
                (
                    None,
                    options.min_length.map(|m| m.max(0) as usize),
                    options.max_length.map(|m| m as usize),
                )
            }
        };

        Ok(ListField {
            decl: Arc::new(Declaration {
                name,
                doc: options.doc,
                item_type,
                default: options.default,
                optional: options.optional,
                length,
                min_length,
                max_length,
                item_check: options.item_check,
                list_check: options.list_check,
                source,
                element,
            }),
        })
    }

    /// Descriptor for element `index` of a nested field, named `<name>[<index>]`.
    ///
    /// Returns `None` for flat fields.
    pub fn element_field(&self, index: usize) -> Option<ListField> {
        let template = self.decl.element.as_ref()?;
        let t = &template.decl;
        Some(ListField {
            decl: Arc::new(Declaration {
                name: format!("{}[{}]", self.decl.name, index),
                doc: format!("subfield[{}] of {}", index, self.decl.name),
                item_type: t.item_type,
                default: t.default.clone(),
                optional: t.optional,
                length: t.length,
                min_length: t.min_length,
                max_length: t.max_length,
                item_check: t.item_check.clone(),
                list_check: t.list_check.clone(),
                source: t.source.clone(),
                element: None,
            }),
        })
    }

    /// Field name, unique within its schema
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// Documentation string
    pub fn doc(&self) -> &str {
        &self.decl.doc
    }

    /// Item type (the scalar type for nested fields)
    pub fn item_type(&self) -> ItemType {
        self.decl.item_type
    }

    /// Default value
    pub fn default_value(&self) -> Option<&Value> {
        self.decl.default.as_ref()
    }

    /// Whether the field may be unset at validation time
    pub fn is_optional(&self) -> bool {
        self.decl.optional
    }

    /// Whether elements are themselves lists
    pub fn is_nested(&self) -> bool {
        self.decl.element.is_some()
    }

    /// Exact required length
    pub fn length(&self) -> Option<usize> {
        self.decl.length
    }

    /// Minimum length
    pub fn min_length(&self) -> Option<usize> {
        self.decl.min_length
    }

    /// Maximum length
    pub fn max_length(&self) -> Option<usize> {
        self.decl.max_length
    }

    /// Where the field was declared
    pub fn source(&self) -> &CallSite {
        &self.decl.source
    }

    // ------------------------------------------------------------------------
    // Owner-facing operations
    // ------------------------------------------------------------------------

    /// Current container bound to this field on `owner`
    pub fn get<'o, O: FieldOwner + ?Sized>(&self, owner: &'o O) -> Option<&'o ListValue> {
        owner.slot(self.name()).and_then(|slot| slot.value())
    }

    /// Assign a whole new value. `Value::Null` unsets the field.
    ///
    /// The previous container is discarded; the field's ledger on `owner`
    /// receives one record labelled `"assignment"` unless `origin` says
    /// otherwise.
    pub fn set<O: FieldOwner + ?Sized>(
        &self,
        owner: &mut O,
        value: impl Into<Value>,
        origin: &Origin,
    ) -> Result<()> {
        let scope = owner.scope();
        if owner.slot(self.name()).is_none() {
            return Err(self.unknown(&scope));
        }
        scope.ensure_mutable(self.name())?;

        let origin = origin.or_label("assignment");
        let label = origin.label_or("assignment");
        let container = match value.into() {
            Value::Null => None,
            value => Some(ListValue::build(self, &scope, value, &origin)?),
        };
        let snapshot = container
            .as_ref()
            .map(ListValue::to_value)
            .unwrap_or(Value::Null);

        let slot = owner
            .slot_mut(self.name())
            .ok_or_else(|| self.unknown(&scope))?;
        slot.value = container;
        if origin.records() {
            slot.history.push(ProvenanceRecord::new(
                snapshot,
                origin.call_site().clone(),
                label,
            ));
        }
        debug!(target: "fieldtrail::field", owner = scope.owner(), field = self.name(), label, "Field assigned");
        Ok(())
    }

    /// Mutable handle on a flat list held by this field
    pub fn list_mut<'o, O: FieldOwner + ?Sized>(&self, owner: &'o mut O) -> Result<ListMut<'o>> {
        let scope = owner.scope();
        let slot = owner
            .slot_mut(self.name())
            .ok_or_else(|| self.unknown(&scope))?;
        match &mut slot.value {
            Some(ListValue::Flat(list)) => Ok(ListMut::new(list, &mut slot.history, scope)),
            Some(ListValue::Nested(_)) => Err(self.wrong_container(&scope, "flat")),
            None => Err(self.unset(&scope)),
        }
    }

    /// Mutable handle on a nested list held by this field
    pub fn nested_mut<'o, O: FieldOwner + ?Sized>(
        &self,
        owner: &'o mut O,
    ) -> Result<NestedListMut<'o>> {
        let scope = owner.scope();
        let slot = owner
            .slot_mut(self.name())
            .ok_or_else(|| self.unknown(&scope))?;
        match &mut slot.value {
            Some(ListValue::Nested(list)) => Ok(NestedListMut::new(list, &mut slot.history, scope)),
            Some(ListValue::Flat(_)) => Err(self.wrong_container(&scope, "nested")),
            None => Err(self.unset(&scope)),
        }
    }

    /// Check the field's current value on `owner`.
    ///
    /// # Errors
    ///
    /// `MissingRequired`, `WrongLength`, `TooShort`, `TooLong` or
    /// `FailedListCheck`; for nested fields, the same kinds raised by an
    /// element's descriptor (named `<name>[<index>]`).
    pub fn validate<O: FieldOwner + ?Sized>(&self, owner: &O) -> Result<()> {
        let scope = owner.scope();
        let slot = owner.slot(self.name()).ok_or_else(|| self.unknown(&scope))?;
        match slot.value() {
            None if self.is_optional() => Ok(()),
            None => Err(scope.invalid(
                self.name(),
                ValidationKind::MissingRequired,
                "Required value cannot be None",
            )),
            Some(ListValue::Flat(list)) => self.check_list(&scope, list),
            Some(ListValue::Nested(nested)) => {
                self.check_bounds(&scope, nested.len(), || nested.to_value())?;
                nested.validate_elements(&scope)
            }
        }
    }

    /// Plain-value export of the field on `owner` (`Null` when unset)
    pub fn to_value<O: FieldOwner + ?Sized>(&self, owner: &O) -> Value {
        self.get(owner).map(ListValue::to_value).unwrap_or(Value::Null)
    }

    // ------------------------------------------------------------------------
    // Checks used by the containers
    // ------------------------------------------------------------------------

    pub(crate) fn check_list(&self, scope: &Scope, list: &List) -> Result<()> {
        self.check_bounds(scope, list.len(), || list.to_value())
    }

    fn check_bounds<F>(&self, scope: &Scope, len: usize, snapshot: F) -> Result<()>
    where
        F: FnOnce() -> Value,
    {
        let d = &self.decl;
        if let Some(length) = d.length {
            if len != length {
                return Err(scope.invalid(
                    self.name(),
                    ValidationKind::WrongLength,
                    format!("Required list length={}, got length={}", length, len),
                ));
            }
        }
        if let Some(min) = d.min_length {
            if len < min {
                return Err(scope.invalid(
                    self.name(),
                    ValidationKind::TooShort,
                    format!("Minimum allowed list length={}, got length={}", min, len),
                ));
            }
        }
        if let Some(max) = d.max_length {
            if len > max {
                return Err(scope.invalid(
                    self.name(),
                    ValidationKind::TooLong,
                    format!("Maximum allowed list length={}, got length={}", max, len),
                ));
            }
        }
        if let Some(check) = &d.list_check {
            let value = snapshot();
            if !check(&value) {
                return Err(scope.invalid(
                    self.name(),
                    ValidationKind::FailedListCheck,
                    format!("{} is not a valid value", value),
                ));
            }
        }
        Ok(())
    }

    /// Cast `value` to the item type and run the item predicate
    pub(crate) fn check_item(&self, scope: &Scope, position: usize, value: Value) -> Result<Value> {
        let value = self.item_type().cast(value);
        if !self.item_type().accepts(&value) {
            return Err(scope.invalid(
                self.name(),
                ValidationKind::ItemTypeMismatch,
                format!(
                    "Item at position {} with value {} is of incorrect type {}. Expected {}",
                    position,
                    value,
                    value.type_name(),
                    self.item_type()
                ),
            ));
        }
        self.run_item_check(scope, position, &value)?;
        Ok(value)
    }

    /// Run the item predicate on an element that is itself a list
    pub(crate) fn check_element(&self, scope: &Scope, position: usize, element: &List) -> Result<()> {
        if self.decl.item_check.is_some() {
            self.run_item_check(scope, position, &element.to_value())?;
        }
        Ok(())
    }

    fn run_item_check(&self, scope: &Scope, position: usize, value: &Value) -> Result<()> {
        match &self.decl.item_check {
            Some(check) if !check(value) => Err(scope.invalid(
                self.name(),
                ValidationKind::ItemFailedCheck,
                format!("Item at position {} is not a valid value: {}", position, value),
            )),
            _ => Ok(()),
        }
    }

    /// Unpack a whole-field value into its items
    pub(crate) fn expect_sequence(&self, scope: &Scope, value: Value) -> Result<Vec<Value>> {
        value.into_array().map_err(|other| {
            scope.invalid(
                self.name(),
                ValidationKind::NotASequence,
                format!(
                    "Value {} is of incorrect type {}. Sequence type expected",
                    other,
                    other.type_name()
                ),
            )
        })
    }

    pub(crate) fn out_of_range(&self, scope: &Scope, index: usize, len: usize) -> Error {
        Error::IndexOutOfRange {
            field: self.name().to_string(),
            owner: scope.owner().to_string(),
            index,
            len,
        }
    }

    fn unknown(&self, scope: &Scope) -> Error {
        Error::UnknownField {
            field: self.name().to_string(),
            owner: scope.owner().to_string(),
        }
    }

    fn unset(&self, scope: &Scope) -> Error {
        Error::Unset {
            field: self.name().to_string(),
            owner: scope.owner().to_string(),
        }
    }

    fn wrong_container(&self, scope: &Scope, expected: &'static str) -> Error {
        Error::WrongContainer {
            field: self.name().to_string(),
            owner: scope.owner().to_string(),
            expected,
        }
    }
}

impl fmt::Debug for ListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.decl;
        f.debug_struct("ListField")
            .field("name", &d.name)
            .field("item_type", &d.item_type)
            .field("nested", &d.element.is_some())
            .field("optional", &d.optional)
            .field("length", &d.length)
            .field("min_length", &d.min_length)
            .field("max_length", &d.max_length)
            .field("source", &d.source)
            .finish()
    }
}
