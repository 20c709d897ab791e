//! Declaration options for list fields
//!
//! `ListFieldOptions` carries everything a list field declaration can say.
//! It deserializes from any serde format, so schemas can be declared in
//! data as well as in code:
//!
//! ```text
//! doc = "Per-amplifier readout windows"
//! dtype = "int"
//! min_length = 2
//! max_length = 5
//! default = [[1], [2, 3]]
//!
//! [subfield]
//! min_length = 1
//! ```
//!
//! Predicates cannot be expressed in data and are attached in code with
//! `with_item_check` / `with_list_check`.

use fieldtrail_core::{ItemType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A user-supplied predicate over one item or one whole list
pub type Check = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Options for declaring a `ListField`
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListFieldOptions {
    /// Documentation string
    pub doc: String,
    /// Item type; required on top-level declarations, inherited by `subfield`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtype: Option<ItemType>,
    /// Value installed when a configuration is instantiated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether the field may hold no value at validation time
    pub optional: bool,
    /// Exact required length; clears `min_length` and `max_length`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    /// Minimum length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    /// Maximum length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    /// Constraints applied to every element of a nested list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfield: Option<Box<ListFieldOptions>>,
    /// Predicate applied to each item at mutation time
    #[serde(skip)]
    pub item_check: Option<Check>,
    /// Predicate applied to the whole list at validation time
    #[serde(skip)]
    pub list_check: Option<Check>,
}

impl ListFieldOptions {
    /// Options for a field holding items of `dtype`
    pub fn new(dtype: ItemType) -> Self {
        ListFieldOptions {
            dtype: Some(dtype),
            ..Self::default()
        }
    }

    /// Set the documentation string
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Allow the field to be unset at validation time
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Require an exact length
    pub fn with_length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    /// Require a minimum length
    pub fn with_min_length(mut self, min_length: i64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Require a maximum length
    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Constrain each element of a nested list
    pub fn with_subfield(mut self, subfield: ListFieldOptions) -> Self {
        self.subfield = Some(Box::new(subfield));
        self
    }

    /// Attach a per-item predicate
    pub fn with_item_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.item_check = Some(Arc::new(check));
        self
    }

    /// Attach a whole-list predicate
    pub fn with_list_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.list_check = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for ListFieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListFieldOptions")
            .field("doc", &self.doc)
            .field("dtype", &self.dtype)
            .field("default", &self.default)
            .field("optional", &self.optional)
            .field("length", &self.length)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("subfield", &self.subfield)
            .field("item_check", &self.item_check.is_some())
            .field("list_check", &self.list_check.is_some())
            .finish()
    }
}
