//! Core types for fieldtrail
//!
//! This crate defines the foundational types used by list fields:
//! - Value: Unified value enum for items, elements and snapshots
//! - ItemType: Closed set of item type tags with explicit conversions
//! - CallSite / Origin: Explicit provenance threaded through mutations
//! - ProvenanceRecord / History: The append-only audit trail
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod history;
pub mod item_type;
pub mod provenance;
pub mod value;

pub use error::{Error, Result, SchemaError, ValidationKind};
pub use history::History;
pub use item_type::ItemType;
pub use provenance::{CallSite, Origin, ProvenanceRecord};
pub use value::Value;
