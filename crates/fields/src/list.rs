//! Flat list container
//!
//! A `List` holds validated scalar items for one field. It has no ledger of
//! its own: recording is done by the handle that mutated it, against the
//! ledger the owner (or the enclosing sub-list) keeps.
//!
//! Every mutating primitive checks the frozen gate, then stages and
//! validates all incoming items, and only then touches `items`. A failed
//! call leaves the list exactly as it was.

use crate::field::ListField;
use crate::owner::Scope;
use crate::sequence::Sequence;
use fieldtrail_core::{Result, Value};
use std::fmt;
use std::ops::Range;

/// Validated sequence of scalar items bound to one field
#[derive(Clone)]
pub struct List {
    field: ListField,
    items: Vec<Value>,
}

impl List {
    pub(crate) fn build(field: &ListField, scope: &Scope, value: Value) -> Result<Self> {
        let values = field.expect_sequence(scope, value)?;
        Self::from_items(field, scope, values)
    }

    pub(crate) fn from_items(field: &ListField, scope: &Scope, values: Vec<Value>) -> Result<Self> {
        let items = stage(field, scope, 0, values)?;
        Ok(List {
            field: field.clone(),
            items,
        })
    }

    /// Descriptor this list is bound to
    pub fn field(&self) -> &ListField {
        &self.field
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Items in `range`, `None` if out of bounds
    pub fn slice(&self, range: Range<usize>) -> Option<&[Value]> {
        self.items.get(range)
    }

    /// All items
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Iterate over items
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Owned snapshot as `Value::Array`
    pub fn to_value(&self) -> Value {
        Value::Array(self.items.clone())
    }

    pub(crate) fn rebind(&mut self, field: ListField) {
        self.field = field;
    }

    pub(crate) fn set_at(&mut self, scope: &Scope, index: usize, value: Value) -> Result<()> {
        scope.ensure_mutable(self.field.name())?;
        let value = self.field.check_item(scope, index, value)?;
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or_else(|| self.field.out_of_range(scope, index, len))?;
        *slot = value;
        Ok(())
    }

    pub(crate) fn splice(&mut self, scope: &Scope, range: Range<usize>, values: Vec<Value>) -> Result<()> {
        scope.ensure_mutable(self.field.name())?;
        let range = clamp(range, self.items.len());
        let staged = stage(&self.field, scope, range.start, values)?;
        self.items.splice(range, staged);
        Ok(())
    }

    /// Check that `values` could be appended one at a time
    pub(crate) fn check_append(&self, scope: &Scope, values: &[Value]) -> Result<()> {
        scope.ensure_mutable(self.field.name())?;
        let len = self.items.len();
        for (j, value) in values.iter().enumerate() {
            self.field.check_item(scope, len + j, value.clone())?;
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, scope: &Scope, index: usize) -> Result<Value> {
        scope.ensure_mutable(self.field.name())?;
        if index >= self.items.len() {
            return Err(self.field.out_of_range(scope, index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }
}

/// Cast and check `values` as items destined for positions `start..`
fn stage(field: &ListField, scope: &Scope, start: usize, values: Vec<Value>) -> Result<Vec<Value>> {
    values
        .into_iter()
        .enumerate()
        .map(|(j, v)| field.check_item(scope, start + j, v))
        .collect()
}

/// Clamp a slice range to `len` the way slice assignment does
pub(crate) fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);
    start..end
}

impl Sequence for List {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn to_value(&self) -> Value {
        List::to_value(self)
    }

    fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("field", &self.field.name())
            .field("items", &self.items)
            .finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

impl<T: ?Sized> PartialEq<T> for List
where
    Value: PartialEq<T>,
{
    fn eq(&self, other: &T) -> bool {
        self.to_value() == *other
    }
}
