//! Error types for list fields
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! - `SchemaError`: a field or schema declaration is malformed; raised while
//!   the schema is being built
//! - `Error`: everything raised at mutation or validation time

use thiserror::Error;

/// Result type alias for field operations
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed field or schema declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Item type name outside the supported set
    #[error("Unsupported item type '{name}'")]
    UnsupportedItemType {
        /// Name that failed to parse
        name: String,
    },

    /// No item type given for a field
    #[error("Field '{0}' declares no item type")]
    MissingItemType(String),

    /// `length` must be positive
    #[error("'length' ({0}) must be positive")]
    NonPositiveLength(i64),

    /// `max_length` must be positive
    #[error("'max_length' ({0}) must be positive")]
    NonPositiveMaxLength(i64),

    /// `min_length` greater than `max_length`
    #[error("'max_length' ({max}) must be at least as large as 'min_length' ({min})")]
    MinExceedsMax {
        /// Declared minimum
        min: i64,
        /// Declared maximum
        max: i64,
    },

    /// Two fields with the same name in one schema
    #[error("Duplicate field '{0}'")]
    DuplicateField(String),
}

/// Reason a value failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// Non-optional field holds no value
    MissingRequired,
    /// Length differs from the declared exact `length`
    WrongLength,
    /// Shorter than `min_length`
    TooShort,
    /// Longer than `max_length`
    TooLong,
    /// The whole-list predicate returned false
    FailedListCheck,
    /// An item does not have the declared item type
    ItemTypeMismatch,
    /// The per-item predicate returned false
    ItemFailedCheck,
    /// A nested element is not a sequence
    NotIterableElement,
    /// A nested element is text
    StringElementDisallowed,
    /// A whole-field value is not a sequence
    NotASequence,
}

/// Error types for field mutation and validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Declaration error surfaced at runtime
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A value broke a field constraint
    #[error("{owner}.{field}: {message}")]
    Validation {
        /// Field name (e.g. `x` or `x[1]`)
        field: String,
        /// Owning configuration type
        owner: String,
        /// What went wrong
        kind: ValidationKind,
        /// Human-readable description of the offending value or index
        message: String,
    },

    /// Mutation attempted on a frozen configuration
    #[error("{owner}.{field}: Cannot modify a frozen Config")]
    FrozenMutation {
        /// Field name
        field: String,
        /// Owning configuration type
        owner: String,
    },

    /// Single-index access past the end
    #[error("{owner}.{field}: index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Field name
        field: String,
        /// Owning configuration type
        owner: String,
        /// Requested index
        index: usize,
        /// Current length
        len: usize,
    },

    /// Field not declared on the owner
    #[error("{owner} has no field '{field}'")]
    UnknownField {
        /// Field name
        field: String,
        /// Owning configuration type
        owner: String,
    },

    /// Field currently holds no value
    #[error("{owner}.{field} is unset")]
    Unset {
        /// Field name
        field: String,
        /// Owning configuration type
        owner: String,
    },

    /// Field holds the other container variant
    #[error("{owner}.{field} is not a {expected} list")]
    WrongContainer {
        /// Field name
        field: String,
        /// Owning configuration type
        owner: String,
        /// `"flat"` or `"nested"`
        expected: &'static str,
    },
}

impl Error {
    /// Build a validation error
    pub fn validation(
        field: impl Into<String>,
        owner: impl Into<String>,
        kind: ValidationKind,
        message: impl Into<String>,
    ) -> Self {
        Error::Validation {
            field: field.into(),
            owner: owner.into(),
            kind,
            message: message.into(),
        }
    }

    /// Validation sub-kind, if this is a validation error
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            Error::Validation { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether this error came from the frozen gate
    pub fn is_frozen(&self) -> bool {
        matches!(self, Error::FrozenMutation { .. })
    }
}
