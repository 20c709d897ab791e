//! List-valued configuration fields with provenance tracking
//!
//! This crate provides:
//! - ListField: Schema declaration of a list attribute (item type, length
//!   bounds, predicates, default)
//! - List / NestedList / SubList: Validated containers bound to a field
//! - ListMut / NestedListMut / SubListMut: Mutation handles that record every
//!   change in the field's History
//! - Schema / Config: A minimal owning configuration with a frozen gate
//!
//! Every mutation validates first and only then applies, so a failed call
//! leaves the container untouched and the ledger unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod field;
pub mod list;
pub mod nested;
pub mod options;
pub mod owner;
pub mod sequence;

pub use config::{Config, Schema};
pub use field::ListField;
pub use list::List;
pub use nested::{NestedList, NestedListMut, SubList, SubListMut};
pub use options::{Check, ListFieldOptions};
pub use owner::{FieldOwner, FieldSlot, ListValue, Scope};
pub use sequence::{ListMut, Sequence, SequenceMut};

pub use fieldtrail_core::{
    CallSite, Error, History, ItemType, Origin, ProvenanceRecord, Result, SchemaError,
    ValidationKind, Value,
};
