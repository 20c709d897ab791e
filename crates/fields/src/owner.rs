//! The owning-configuration seam
//!
//! Fields do not store anything themselves. Whatever plays the role of a
//! configuration instance implements [`FieldOwner`]: it reports its type
//! name and frozen state as a [`Scope`], and hands out one [`FieldSlot`] per
//! declared field. A slot holds the field's current container and the
//! field's ledger; the ledger outlives any single container, so whole-field
//! reassignment keeps appending to the same history.

use crate::field::ListField;
use crate::list::List;
use crate::nested::NestedList;
use crate::sequence::Sequence;
use fieldtrail_core::{Error, History, Origin, Result, ValidationKind, Value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Owner identity and frozen flag, captured once per operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    owner: Arc<str>,
    frozen: bool,
}

impl Scope {
    /// Scope for an owner named `owner`
    pub fn new(owner: impl Into<Arc<str>>, frozen: bool) -> Self {
        Scope {
            owner: owner.into(),
            frozen,
        }
    }

    /// Owning configuration type name
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether the owner is frozen
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn ensure_mutable(&self, field: &str) -> Result<()> {
        if self.frozen {
            warn!(target: "fieldtrail::field", owner = self.owner(), field, "Mutation refused on frozen config");
            return Err(Error::FrozenMutation {
                field: field.to_string(),
                owner: self.owner().to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn invalid(
        &self,
        field: &str,
        kind: ValidationKind,
        message: impl Into<String>,
    ) -> Error {
        Error::validation(field, self.owner(), kind, message)
    }
}

/// The container bound to a field: flat or nested
#[derive(Clone)]
pub enum ListValue {
    /// List of scalar items
    Flat(List),
    /// List of element sub-lists
    Nested(NestedList),
}

impl ListValue {
    /// Build and validate a container for `field` from a raw value
    pub(crate) fn build(field: &ListField, scope: &Scope, value: Value, origin: &Origin) -> Result<Self> {
        if field.is_nested() {
            NestedList::build(field, scope, value, origin).map(ListValue::Nested)
        } else {
            List::build(field, scope, value).map(ListValue::Flat)
        }
    }

    /// Descriptor the container is bound to
    pub fn field(&self) -> &ListField {
        match self {
            ListValue::Flat(l) => l.field(),
            ListValue::Nested(n) => n.field(),
        }
    }

    /// The flat list, if this is one
    pub fn as_flat(&self) -> Option<&List> {
        match self {
            ListValue::Flat(l) => Some(l),
            ListValue::Nested(_) => None,
        }
    }

    /// The nested list, if this is one
    pub fn as_nested(&self) -> Option<&NestedList> {
        match self {
            ListValue::Nested(n) => Some(n),
            ListValue::Flat(_) => None,
        }
    }
}

impl Sequence for ListValue {
    fn len(&self) -> usize {
        match self {
            ListValue::Flat(l) => l.len(),
            ListValue::Nested(n) => n.len(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            ListValue::Flat(l) => l.to_value(),
            ListValue::Nested(n) => n.to_value(),
        }
    }
}

impl fmt::Debug for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListValue::Flat(l) => fmt::Debug::fmt(l, f),
            ListValue::Nested(n) => fmt::Debug::fmt(n, f),
        }
    }
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

impl<T: ?Sized> PartialEq<T> for ListValue
where
    Value: PartialEq<T>,
{
    fn eq(&self, other: &T) -> bool {
        self.to_value() == *other
    }
}

/// Per-field storage on an owner: current container plus ledger
#[derive(Debug, Clone, Default)]
pub struct FieldSlot {
    pub(crate) value: Option<ListValue>,
    pub(crate) history: History,
}

impl FieldSlot {
    /// Empty slot: unset, no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Current container, `None` when unset
    pub fn value(&self) -> Option<&ListValue> {
        self.value.as_ref()
    }

    /// The field's ledger on this owner
    pub fn history(&self) -> &History {
        &self.history
    }
}

/// Something that owns list fields: a configuration instance
pub trait FieldOwner {
    /// Owner name and frozen state
    fn scope(&self) -> Scope;

    /// Slot for a declared field
    fn slot(&self, field: &str) -> Option<&FieldSlot>;

    /// Mutable slot for a declared field
    fn slot_mut(&mut self, field: &str) -> Option<&mut FieldSlot>;
}
