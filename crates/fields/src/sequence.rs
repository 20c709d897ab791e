//! Sequence traits and the flat-list handle
//!
//! [`Sequence`] is the read side shared by every container. [`SequenceMut`]
//! is the write side, implemented by the three mutable handles:
//!
//! - [`ListMut`]: a flat list field
//! - [`NestedListMut`](crate::nested::NestedListMut): a nested list field
//! - [`SubListMut`](crate::nested::SubListMut): one element of a nested list
//!
//! Each handle couples a container with the ledger it records into and the
//! owner's [`Scope`]. One successful call appends exactly one record to that
//! ledger (sub-list handles additionally append one record to the parent's).

use crate::list::List;
use crate::owner::Scope;
use fieldtrail_core::{History, Origin, ProvenanceRecord, Result, Value};
use std::ops::Range;
use tracing::trace;

/// Read access common to every container
pub trait Sequence {
    /// Number of elements
    fn len(&self) -> usize;

    /// Deep snapshot as a plain `Value::Array`
    fn to_value(&self) -> Value;

    /// Whether there are no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural, element-wise equality with any sequence-like value
    fn equals(&self, other: &Value) -> bool {
        self.to_value() == *other
    }

    /// Whether some element equals `value`
    fn contains(&self, value: &Value) -> bool {
        match self.to_value() {
            Value::Array(items) => items.contains(value),
            _ => false,
        }
    }
}

/// Validated, history-recording mutation
pub trait SequenceMut: Sequence {
    /// The ledger this handle records into
    fn history(&self) -> &History;

    /// Replace element `index`; default label `"setitem"`
    fn set(&mut self, index: usize, value: impl Into<Value>, origin: &Origin) -> Result<()>;

    /// Replace `range` with `values` (lengths may differ); default label `"setitem"`
    fn set_slice<I, V>(&mut self, range: Range<usize>, values: I, origin: &Origin) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>;

    /// Remove element `index`; default label `"delitem"`
    fn delete(&mut self, index: usize, origin: &Origin) -> Result<()>;

    /// Check, without changing anything, that appending `values` in order
    /// would succeed
    fn check_append(&self, values: &[Value]) -> Result<()>;

    /// Insert before `index` (clamped to the length); default label `"insert"`
    fn insert(&mut self, index: usize, value: impl Into<Value>, origin: &Origin) -> Result<()> {
        self.set_slice(index..index, [value.into()], &origin.or_label("insert"))
    }

    /// Insert at the end
    fn append(&mut self, value: impl Into<Value>, origin: &Origin) -> Result<()> {
        let len = self.len();
        self.insert(len, value, origin)
    }

    /// Append each value in turn, one record per value. All values are
    /// checked first: on failure nothing is appended or recorded.
    fn extend<I, V>(&mut self, values: I, origin: &Origin) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.check_append(&values)?;
        for value in values {
            self.append(value, origin)?;
        }
        Ok(())
    }
}

/// Mutable handle on a flat list field
#[derive(Debug)]
pub struct ListMut<'a> {
    list: &'a mut List,
    history: &'a mut History,
    scope: Scope,
}

impl<'a> ListMut<'a> {
    pub(crate) fn new(list: &'a mut List, history: &'a mut History, scope: Scope) -> Self {
        ListMut {
            list,
            history,
            scope,
        }
    }

    /// The underlying list
    pub fn list(&self) -> &List {
        &*self.list
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.list.get(index)
    }

    fn record(&mut self, origin: &Origin, default: &str) {
        if !origin.records() {
            return;
        }
        let label = origin.label_or(default);
        trace!(target: "fieldtrail::list", field = self.list.field().name(), label, len = self.list.len(), "List mutated");
        self.history.push(ProvenanceRecord::new(
            self.list.to_value(),
            origin.call_site().clone(),
            label,
        ));
    }
}

impl Sequence for ListMut<'_> {
    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_value(&self) -> Value {
        self.list.to_value()
    }
}

impl SequenceMut for ListMut<'_> {
    fn history(&self) -> &History {
        &*self.history
    }

    fn set(&mut self, index: usize, value: impl Into<Value>, origin: &Origin) -> Result<()> {
        self.list.set_at(&self.scope, index, value.into())?;
        self.record(origin, "setitem");
        Ok(())
    }

    fn set_slice<I, V>(&mut self, range: Range<usize>, values: I, origin: &Origin) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.list.splice(&self.scope, range, values)?;
        self.record(origin, "setitem");
        Ok(())
    }

    fn delete(&mut self, index: usize, origin: &Origin) -> Result<()> {
        self.list.remove(&self.scope, index)?;
        self.record(origin, "delitem");
        Ok(())
    }

    fn check_append(&self, values: &[Value]) -> Result<()> {
        self.list.check_append(&self.scope, values)
    }
}
