//! Nested list container
//!
//! A `NestedList` is a list whose elements are [`SubList`]s. Assigning a raw
//! sequence to a slot runs the element transform:
//!
//! 1. text is refused (`StringElementDisallowed`) and so is anything that is
//!    not an array (`NotIterableElement`)
//! 2. the descriptor for that index is fetched from the memo cache, or
//!    derived from the field's element template; it is cached only once an
//!    element is actually stored at that index
//! 3. the items are validated into a `List` bound to that descriptor
//! 4. the result is wrapped in a `SubList` with a fresh ledger holding one
//!    record of its construction
//!
//! Mutating a sub-list through [`SubListMut`] appends one record to the
//! sub-list's own ledger and one to the parent field's ledger, labelled
//! `<label>[<index>]`.
//!
//! Element indices are kept in step with position: inserting or deleting
//! before an element renumbers it and rebinds it to the descriptor of its
//! new index.

use crate::field::ListField;
use crate::list::{clamp, List};
use crate::owner::Scope;
use crate::sequence::{Sequence, SequenceMut};
use fieldtrail_core::{History, Origin, ProvenanceRecord, Result, ValidationKind, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use tracing::trace;

/// One element of a nested list: a list with its own ledger and position
#[derive(Clone)]
pub struct SubList {
    pub(crate) list: List,
    pub(crate) index: usize,
    pub(crate) history: History,
}

impl SubList {
    /// Position within the parent
    pub fn index(&self) -> usize {
        self.index
    }

    /// The element's items
    pub fn list(&self) -> &List {
        &self.list
    }

    /// The element's own ledger
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Descriptor for this position (`<parent>[<index>]`)
    pub fn field(&self) -> &ListField {
        self.list.field()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the element is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.list.get(index)
    }

    /// Iterate over items
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.list.iter()
    }

    /// Owned snapshot as `Value::Array`
    pub fn to_value(&self) -> Value {
        self.list.to_value()
    }
}

impl Sequence for SubList {
    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_value(&self) -> Value {
        self.list.to_value()
    }
}

impl fmt::Debug for SubList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubList")
            .field("index", &self.index)
            .field("items", &self.list.as_slice())
            .field("history", &self.history.len())
            .finish()
    }
}

impl fmt::Display for SubList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.list, f)
    }
}

impl<T: ?Sized> PartialEq<T> for SubList
where
    Value: PartialEq<T>,
{
    fn eq(&self, other: &T) -> bool {
        self.to_value() == *other
    }
}

/// List of sub-lists bound to a nested field
#[derive(Clone)]
pub struct NestedList {
    field: ListField,
    pub(crate) items: Vec<SubList>,
    // index -> element descriptor; filled on first use, never evicted
    subfields: BTreeMap<usize, ListField>,
}

impl NestedList {
    pub(crate) fn build(field: &ListField, scope: &Scope, value: Value, origin: &Origin) -> Result<Self> {
        let values = field.expect_sequence(scope, value)?;
        let mut nested = NestedList {
            field: field.clone(),
            items: Vec::with_capacity(values.len()),
            subfields: BTreeMap::new(),
        };
        let label = origin.label_or("assignment");
        nested.items = nested.stage(scope, 0, values, origin, label)?;
        Ok(nested)
    }

    /// Descriptor this list is bound to
    pub fn field(&self) -> &ListField {
        &self.field
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&SubList> {
        self.items.get(index)
    }

    /// Elements in `range`, `None` if out of bounds
    pub fn slice(&self, range: Range<usize>) -> Option<&[SubList]> {
        self.items.get(range)
    }

    /// Iterate over elements
    pub fn iter(&self) -> std::slice::Iter<'_, SubList> {
        self.items.iter()
    }

    /// Deep snapshot: an array of element arrays
    pub fn to_value(&self) -> Value {
        Value::Array(self.items.iter().map(SubList::to_value).collect())
    }

    /// Validate every element against the descriptor for its index
    pub(crate) fn validate_elements(&self, scope: &Scope) -> Result<()> {
        for sub in &self.items {
            sub.field().check_list(scope, &sub.list)?;
        }
        Ok(())
    }

    /// Element transform: raw value -> validated list bound to the
    /// descriptor for `index`. Nothing is cached or recorded.
    fn build_element(&self, scope: &Scope, index: usize, value: Value) -> Result<List> {
        let values = match value {
            Value::Array(values) => values,
            Value::String(s) => {
                return Err(scope.invalid(
                    self.field.name(),
                    ValidationKind::StringElementDisallowed,
                    format!("Cannot set a nested list element to a string: {:?}", s),
                ))
            }
            other => {
                return Err(scope.invalid(
                    self.field.name(),
                    ValidationKind::NotIterableElement,
                    format!(
                        "A nested list element must be a sequence, got {} ({})",
                        other,
                        other.type_name()
                    ),
                ))
            }
        };

        let field = self.descriptor(index);
        let list = List::from_items(&field, scope, values)?;
        self.field.check_element(scope, index, &list)?;
        Ok(list)
    }

    /// Cached descriptor for `index`, or a fresh one left uncached
    fn descriptor(&self, index: usize) -> ListField {
        match self.subfields.get(&index) {
            Some(field) => field.clone(),
            None => derive_subfield(&self.field, index),
        }
    }

    /// Adopt a validated list as the element at `index`
    fn wrap(&mut self, index: usize, list: List, origin: &Origin, label: &str) -> SubList {
        self.subfields
            .entry(index)
            .or_insert_with(|| list.field().clone());

        let mut history = History::new();
        if origin.records() {
            history.push(ProvenanceRecord::new(
                list.to_value(),
                origin.call_site().clone(),
                label,
            ));
        }
        SubList {
            list,
            index,
            history,
        }
    }

    fn stage(
        &mut self,
        scope: &Scope,
        start: usize,
        values: Vec<Value>,
        origin: &Origin,
        label: &str,
    ) -> Result<Vec<SubList>> {
        let lists = values
            .into_iter()
            .enumerate()
            .map(|(j, v)| self.build_element(scope, start + j, v))
            .collect::<Result<Vec<_>>>()?;
        Ok(lists
            .into_iter()
            .enumerate()
            .map(|(j, list)| self.wrap(start + j, list, origin, label))
            .collect())
    }

    pub(crate) fn set_at(
        &mut self,
        scope: &Scope,
        index: usize,
        value: Value,
        origin: &Origin,
        label: &str,
    ) -> Result<()> {
        scope.ensure_mutable(self.field.name())?;
        let list = self.build_element(scope, index, value)?;
        if index >= self.items.len() {
            return Err(self.field.out_of_range(scope, index, self.items.len()));
        }
        let sub = self.wrap(index, list, origin, label);
        self.items[index] = sub;
        Ok(())
    }

    pub(crate) fn splice(
        &mut self,
        scope: &Scope,
        range: Range<usize>,
        values: Vec<Value>,
        origin: &Origin,
        label: &str,
    ) -> Result<()> {
        scope.ensure_mutable(self.field.name())?;
        let range = clamp(range, self.items.len());
        let start = range.start;
        let staged = self.stage(scope, start, values, origin, label)?;
        self.items.splice(range, staged);
        self.reindex(start);
        Ok(())
    }

    /// Check that `values` could be appended one at a time
    pub(crate) fn check_append(&self, scope: &Scope, values: &[Value]) -> Result<()> {
        scope.ensure_mutable(self.field.name())?;
        let len = self.items.len();
        for (j, value) in values.iter().enumerate() {
            self.build_element(scope, len + j, value.clone())?;
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, scope: &Scope, index: usize) -> Result<SubList> {
        scope.ensure_mutable(self.field.name())?;
        if index >= self.items.len() {
            return Err(self.field.out_of_range(scope, index, self.items.len()));
        }
        let removed = self.items.remove(index);
        self.reindex(index);
        Ok(removed)
    }

    fn reindex(&mut self, from: usize) {
        let NestedList {
            field,
            items,
            subfields,
        } = self;
        for (i, sub) in items.iter_mut().enumerate().skip(from) {
            if sub.index != i {
                sub.index = i;
                let descriptor = subfields
                    .entry(i)
                    .or_insert_with(|| derive_subfield(field, i))
                    .clone();
                sub.list.rebind(descriptor);
            }
        }
    }

    #[cfg(test)]
    fn cached_indices(&self) -> Vec<usize> {
        self.subfields.keys().copied().collect()
    }
}

/// Element descriptor for `index` derived from the parent's template
fn derive_subfield(parent: &ListField, index: usize) -> ListField {
    // `parent` is nested, so an element descriptor always exists
    parent.element_field(index).unwrap_or_else(|| parent.clone())
}

impl Sequence for NestedList {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn to_value(&self) -> Value {
        NestedList::to_value(self)
    }
}

impl<'a> IntoIterator for &'a NestedList {
    type Item = &'a SubList;
    type IntoIter = std::slice::Iter<'a, SubList>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Debug for NestedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedList")
            .field("field", &self.field.name())
            .field("items", &self.items)
            .finish()
    }
}

impl fmt::Display for NestedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

impl<T: ?Sized> PartialEq<T> for NestedList
where
    Value: PartialEq<T>,
{
    fn eq(&self, other: &T) -> bool {
        self.to_value() == *other
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Mutable handle on a nested list field
#[derive(Debug)]
pub struct NestedListMut<'a> {
    list: &'a mut NestedList,
    history: &'a mut History,
    scope: Scope,
}

impl<'a> NestedListMut<'a> {
    pub(crate) fn new(list: &'a mut NestedList, history: &'a mut History, scope: Scope) -> Self {
        NestedListMut {
            list,
            history,
            scope,
        }
    }

    /// The underlying nested list
    pub fn list(&self) -> &NestedList {
        &*self.list
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&SubList> {
        self.list.get(index)
    }

    /// Mutable handle on element `index`
    pub fn element_mut(&mut self, index: usize) -> Result<SubListMut<'_>> {
        if index >= self.list.len() {
            return Err(self
                .list
                .field()
                .out_of_range(&self.scope, index, self.list.len()));
        }
        Ok(SubListMut {
            parent: &mut *self.list,
            parent_history: &mut *self.history,
            scope: self.scope.clone(),
            index,
        })
    }

    fn record(&mut self, origin: &Origin, default: &str) {
        if !origin.records() {
            return;
        }
        let label = origin.label_or(default);
        trace!(target: "fieldtrail::list", field = self.list.field().name(), label, len = self.list.len(), "Nested list mutated");
        self.history.push(ProvenanceRecord::new(
            self.list.to_value(),
            origin.call_site().clone(),
            label,
        ));
    }
}

impl Sequence for NestedListMut<'_> {
    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_value(&self) -> Value {
        self.list.to_value()
    }
}

impl SequenceMut for NestedListMut<'_> {
    fn history(&self) -> &History {
        &*self.history
    }

    fn set(&mut self, index: usize, value: impl Into<Value>, origin: &Origin) -> Result<()> {
        let label = origin.label_or("setitem");
        self.list
            .set_at(&self.scope, index, value.into(), origin, label)?;
        self.record(origin, "setitem");
        Ok(())
    }

    fn set_slice<I, V>(&mut self, range: Range<usize>, values: I, origin: &Origin) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        let label = origin.label_or("setitem");
        self.list.splice(&self.scope, range, values, origin, label)?;
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

/// Mutable handle on one element of a nested list.
///
/// Every successful call records into the element's ledger and cascades an
/// index-qualified record into the parent field's ledger.
#[derive(Debug)]
pub struct SubListMut<'a> {
    parent: &'a mut NestedList,
    parent_history: &'a mut History,
    scope: Scope,
    index: usize,
}

impl SubListMut<'_> {
    /// Position of the element within its parent
    pub fn index(&self) -> usize {
        self.index
    }

    /// The element
    pub fn sub_list(&self) -> &SubList {
        &self.parent.items[self.index]
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.sub_list().get(index)
    }

    /// Apply `op` to a copy of the element, run the parent's item check on
    /// the result, then commit it
    fn apply<T>(&mut self, op: impl FnOnce(&mut List, &Scope) -> Result<T>) -> Result<T> {
        let scope = self.scope.clone();
        let mut staged = self.parent.items[self.index].list.clone();
        let out = op(&mut staged, &scope)?;
        self.parent.field.check_element(&scope, self.index, &staged)?;
        self.parent.items[self.index].list = staged;
        Ok(out)
    }

    fn record(&mut self, origin: &Origin, default: &str) {
        if !origin.records() {
            return;
        }
        let label = origin.label_or(default);
        let at = origin.call_site();
        let sub = &mut self.parent.items[self.index];
        sub.history
            .push(ProvenanceRecord::new(sub.list.to_value(), at.clone(), label));

        let cascaded = format!("{}[{}]", label, self.index);
        trace!(target: "fieldtrail::list", field = self.parent.field().name(), label = %cascaded, "Element mutated");
        self.parent_history.push(ProvenanceRecord::new(
            self.parent.to_value(),
            at.clone(),
            cascaded,
        ));
    }
}

impl Sequence for SubListMut<'_> {
    fn len(&self) -> usize {
        self.sub_list().len()
    }

    fn to_value(&self) -> Value {
        self.sub_list().to_value()
    }
}

impl SequenceMut for SubListMut<'_> {
    fn history(&self) -> &History {
        self.sub_list().history()
    }

    fn set(&mut self, index: usize, value: impl Into<Value>, origin: &Origin) -> Result<()> {
        let value = value.into();
        self.apply(|list, scope| list.set_at(scope, index, value))?;
        self.record(origin, "setitem");
        Ok(())
    }

    fn set_slice<I, V>(&mut self, range: Range<usize>, values: I, origin: &Origin) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.apply(|list, scope| list.splice(scope, range, values))?;
        self.record(origin, "setitem");
        Ok(())
    }

    fn delete(&mut self, index: usize, origin: &Origin) -> Result<()> {
        self.apply(|list, scope| list.remove(scope, index))?;
        self.record(origin, "delitem");
        Ok(())
    }

    fn check_append(&self, values: &[Value]) -> Result<()> {
        // each append is checked against the element as it would be then
        let mut staged = self.sub_list().list.clone();
        for value in values {
            let end = staged.len();
            staged.splice(&self.scope, end..end, vec![value.clone()])?;
            self.parent.field.check_element(&self.scope, self.index, &staged)?;
        }
        Ok(())
    }
}
