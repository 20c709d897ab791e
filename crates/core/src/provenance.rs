//! Provenance inputs and records
//!
//! Every mutation of a list field is stamped with an [`Origin`]: where the
//! call came from, which label to record, and whether to record at all.
//! The calling layer passes it explicitly; `Origin::here()` uses
//! `#[track_caller]` so the common case costs one token at the call site.
//!
//! A committed mutation produces one [`ProvenanceRecord`] per ledger it
//! touches. Records are immutable once built.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Description of the code that requested a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Source file, empty for purely descriptive call sites
    pub file: Cow<'static, str>,
    /// 1-based line, 0 when unknown
    pub line: u32,
    /// 1-based column, 0 when unknown
    pub column: u32,
    /// Free-form description supplied by the calling layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CallSite {
    /// Capture the caller's source location
    #[track_caller]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    /// Build from a `std::panic::Location`
    pub fn from_location(location: &'static Location<'static>) -> Self {
        CallSite {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            column: location.column(),
            description: None,
        }
    }

    /// A call site that is only a description (e.g. "config file foo.toml")
    pub fn described(description: impl Into<String>) -> Self {
        CallSite {
            file: Cow::Borrowed(""),
            line: 0,
            column: 0,
            description: Some(description.into()),
        }
    }

    /// Whether this call site carries a source location
    pub fn is_located(&self) -> bool {
        !self.file.is_empty()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_located(), &self.description) {
            (true, Some(d)) => write!(f, "{}:{}:{} ({})", self.file, self.line, self.column, d),
            (true, None) => write!(f, "{}:{}:{}", self.file, self.line, self.column),
            (false, Some(d)) => f.write_str(d),
            (false, None) => f.write_str("<unknown>"),
        }
    }
}

/// Provenance parameter threaded through every mutating call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    at: CallSite,
    label: Option<Cow<'static, str>>,
    record: bool,
}

impl Origin {
    /// Origin at the caller's location, default label, recorded
    #[track_caller]
    pub fn here() -> Self {
        Self::at(CallSite::here())
    }

    /// Origin at an explicit call site
    pub fn at(at: CallSite) -> Self {
        Origin {
            at,
            label: None,
            record: true,
        }
    }

    /// Override the operation's default label
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Apply the mutation without appending to any ledger
    pub fn untracked(mut self) -> Self {
        self.record = false;
        self
    }

    /// Copy of this origin labelled `label` unless a label is already set
    pub fn or_label(&self, label: &'static str) -> Origin {
        let mut origin = self.clone();
        if origin.label.is_none() {
            origin.label = Some(Cow::Borrowed(label));
        }
        origin
    }

    /// The call site
    pub fn call_site(&self) -> &CallSite {
        &self.at
    }

    /// Whether history should be appended
    pub fn records(&self) -> bool {
        self.record
    }

    /// The caller's label, or `default` when none was supplied
    pub fn label_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(default)
    }
}

/// One immutable audit-trail entry: (value snapshot, call site, label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    value: Value,
    at: CallSite,
    label: String,
}

impl ProvenanceRecord {
    /// Build a record; `value` must already be an owned snapshot
    pub fn new(value: Value, at: CallSite, label: impl Into<String>) -> Self {
        ProvenanceRecord {
            value,
            at,
            label: label.into(),
        }
    }

    /// Snapshot of the container (or `Null` for an unset field)
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Where the mutation came from
    pub fn call_site(&self) -> &CallSite {
        &self.at
    }

    /// Operation label, e.g. `"setitem"` or `"setitem[1]"`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Destructure into `(value, call site, label)`
    pub fn into_parts(self) -> (Value, CallSite, String) {
        (self.value, self.at, self.label)
    }
}
