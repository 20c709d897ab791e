//! Minimal owning configuration
//!
//! A [`Schema`] is a named, ordered set of [`ListField`] declarations. A
//! [`Config`] is one instance of a schema: it holds a [`FieldSlot`] per
//! field and the frozen flag, and implements [`FieldOwner`] so that the
//! descriptors can read and write through it.
//!
//! Freezing is one-way. Once frozen, every container reachable from the
//! config rejects mutation while reads stay legal.

use crate::field::ListField;
use crate::nested::NestedListMut;
use crate::owner::{FieldOwner, FieldSlot, ListValue, Scope};
use crate::sequence::ListMut;
use fieldtrail_core::{Error, History, Origin, Result, SchemaError, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Named, ordered set of field declarations
#[derive(Debug, Clone)]
pub struct Schema {
    name: Arc<str>,
    fields: Vec<ListField>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Empty schema for configuration type `name`
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Schema {
            name: name.into(),
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a field.
    ///
    /// # Errors
    ///
    /// `SchemaError::DuplicateField` if a field of the same name exists.
    pub fn with_field(mut self, field: ListField) -> std::result::Result<Self, SchemaError> {
        if self.index.contains_key(field.name()) {
            return Err(SchemaError::DuplicateField(field.name().to_string()));
        }
        self.index.insert(field.name().to_string(), self.fields.len());
        self.fields.push(field);
        Ok(self)
    }

    /// Configuration type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[ListField] {
        &self.fields
    }

    /// Field by name
    pub fn field(&self, name: &str) -> Option<&ListField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }
}

/// One instance of a [`Schema`]
#[derive(Debug, Clone)]
pub struct Config {
    schema: Arc<Schema>,
    slots: Vec<FieldSlot>,
    frozen: bool,
}

impl Config {
    /// Instantiate `schema`, installing every field's default.
    ///
    /// Each default is recorded with label `"default"` at the field's
    /// declaration site. Fields without a default start unset (a `null`
    /// record).
    ///
    /// # Errors
    ///
    /// Fails if a declared default does not pass the field's item checks.
    pub fn new(schema: Arc<Schema>) -> Result<Self> {
        let mut config = Config {
            slots: vec![FieldSlot::new(); schema.fields().len()],
            schema: Arc::clone(&schema),
            frozen: false,
        };
        for field in schema.fields() {
            let origin = Origin::at(field.source().clone()).with_label("default");
            let default = field.default_value().cloned().unwrap_or(Value::Null);
            field.set(&mut config, default, &origin)?;
        }
        debug!(target: "fieldtrail::config", config = schema.name(), fields = schema.fields().len(), "Config created");
        Ok(config)
    }

    /// The schema this config instantiates
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Configuration type name
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Whether the config is frozen
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Make the config and every container reachable from it read-only
    pub fn freeze(&mut self) {
        if !self.frozen {
            debug!(target: "fieldtrail::config", config = self.type_name(), "Config frozen");
        }
        self.frozen = true;
    }

    /// Current container of field `name`, `None` when unset or undeclared
    pub fn get(&self, name: &str) -> Option<&ListValue> {
        self.slot(name).and_then(FieldSlot::value)
    }

    /// Ledger of field `name`
    pub fn history(&self, name: &str) -> Option<&History> {
        self.slot(name).map(FieldSlot::history)
    }

    /// Assign field `name` wholesale
    pub fn set(&mut self, name: &str, value: impl Into<Value>, origin: &Origin) -> Result<()> {
        let field = self.declared(name)?;
        field.set(self, value, origin)
    }

    /// Mutable handle on flat field `name`
    pub fn list_mut(&mut self, name: &str) -> Result<ListMut<'_>> {
        let field = self.declared(name)?;
        field.list_mut(self)
    }

    /// Mutable handle on nested field `name`
    pub fn nested_mut(&mut self, name: &str) -> Result<NestedListMut<'_>> {
        let field = self.declared(name)?;
        field.nested_mut(self)
    }

    /// Validate every field in declaration order, stopping at the first error
    pub fn validate(&self) -> Result<()> {
        for field in self.schema.fields() {
            field.validate(self)?;
        }
        debug!(target: "fieldtrail::config", config = self.type_name(), "Config validated");
        Ok(())
    }

    /// Plain export: field name -> value (`Null` when unset)
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.schema
                .fields()
                .iter()
                .map(|f| (f.name().to_string(), f.to_value(self)))
                .collect(),
        )
    }

    fn declared(&self, name: &str) -> Result<ListField> {
        self.schema.field(name).cloned().ok_or_else(|| Error::UnknownField {
            field: name.to_string(),
            owner: self.type_name().to_string(),
        })
    }
}

impl FieldOwner for Config {
    fn scope(&self) -> Scope {
        Scope::new(Arc::clone(&self.schema.name), self.frozen)
    }

    fn slot(&self, field: &str) -> Option<&FieldSlot> {
        let i = *self.schema.index.get(field)?;
        self.slots.get(i)
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut FieldSlot> {
        let i = *self.schema.index.get(field)?;
        self.slots.get_mut(i)
    }
}
