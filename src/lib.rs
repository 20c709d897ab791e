//! Fieldtrail - list-valued configuration fields with a full mutation history
//!
//! A configuration schema declares list fields (flat or nested), each with an
//! item type, length bounds and optional predicates. Every value that enters a
//! field is validated, and every successful change is appended to the field's
//! history together with where it came from.
//!
//! # Quick Start
//!
//! ```
//! use fieldtrail::{Config, ItemType, ListField, ListFieldOptions, Origin, Schema, SequenceMut};
//! use std::sync::Arc;
//!
//! let x = ListField::nested(
//!     "x",
//!     ListFieldOptions::new(ItemType::Int)
//!         .with_min_length(2)
//!         .with_default(vec![vec![1], vec![2, 3]]),
//! )?;
//! let schema = Arc::new(Schema::new("Config1").with_field(x)?);
//! let mut config = Config::new(schema)?;
//!
//! config.nested_mut("x")?.append(vec![4, 5], &Origin::here())?;
//! config.validate()?;
//!
//! assert_eq!(config.history("x").unwrap().labels(), vec!["default", "insert"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - `fieldtrail-core`: values, item types, provenance records, history, errors
//! - `fieldtrail-fields`: field descriptors, containers, mutation handles and
//!   the owning configuration

// Re-export the public API from fieldtrail-fields
pub use fieldtrail_fields::*;
