//! History ledger
//!
//! `History` is the ordered audit trail of one field on one configuration
//! instance (or of one element sub-list). Records are ordered oldest-first.
//! The only mutating operation is [`History::push`]; there is no way to
//! remove, truncate or reorder entries.

use crate::provenance::ProvenanceRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Append-only sequence of provenance records, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: Vec<ProvenanceRecord>,
}

impl History {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(&mut self, record: ProvenanceRecord) {
        self.records.push(record);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index` (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&ProvenanceRecord> {
        self.records.get(index)
    }

    /// Most recent record
    pub fn last(&self) -> Option<&ProvenanceRecord> {
        self.records.last()
    }

    /// Iterate oldest-first
    pub fn iter(&self) -> std::slice::Iter<'_, ProvenanceRecord> {
        self.records.iter()
    }

    /// All records as a slice
    pub fn records(&self) -> &[ProvenanceRecord] {
        &self.records
    }

    /// Labels in order; handy for asserting on mutation sequences
    pub fn labels(&self) -> Vec<&str> {
        self.records.iter().map(ProvenanceRecord::label).collect()
    }

    /// Human-readable report headed by `title`
    pub fn report(&self, title: &str) -> String {
        format!("History of {}\n{}", title, self)
    }
}

impl Index<usize> for History {
    type Output = ProvenanceRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a ProvenanceRecord;
    type IntoIter = std::slice::Iter<'a, ProvenanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "  {} = {}", record.label(), record.value())?;
        }
        Ok(())
    }
}
