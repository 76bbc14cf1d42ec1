//! The [`PropertyStore`]: `PropertyKey` → dense column.
//!
//! Every column has the same length (the allocator's capacity) at all
//! times. Columns sit behind individual `RefCell`s so a behavior can hold
//! a read view of one property while writing another; conflicting borrows
//! of the same column surface as [`ArenaError::BorrowConflict`].

use std::cell::{Ref, RefCell, RefMut};
use std::ops::Range;

use flare_core::{Property, PropertyKey};
use indexmap::IndexMap;

use crate::column::{Column, ColumnValue, Move};
use crate::error::ArenaError;

/// Typed column storage keyed by `(value type, name)`.
///
/// Uses `IndexMap` for deterministic iteration order during relocation.
#[derive(Debug)]
pub struct PropertyStore {
    columns: IndexMap<PropertyKey, RefCell<Column>>,
    len: usize,
}

impl PropertyStore {
    /// Create an empty store whose columns will have `len` slots.
    pub fn new(len: usize) -> Self {
        Self {
            columns: IndexMap::new(),
            len,
        }
    }

    /// Register a column for `key` if one does not exist yet.
    ///
    /// Returns `true` if a column was created. Re-registering an existing
    /// key leaves its values untouched.
    pub fn register(&mut self, key: PropertyKey) -> bool {
        if self.columns.contains_key(&key) {
            return false;
        }
        self.columns
            .insert(key, RefCell::new(Column::new(key.value_type(), self.len)));
        true
    }

    /// Whether `key` has a column.
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.columns.contains_key(key)
    }

    /// Slots per column.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether columns have zero slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of registered columns.
    pub fn property_count(&self) -> usize {
        self.columns.len()
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> + '_ {
        self.columns.keys()
    }

    /// Borrow `range` of a column for reading.
    pub fn read<T: ColumnValue>(
        &self,
        property: &Property<T>,
        range: Range<usize>,
    ) -> Result<Ref<'_, [T]>, ArenaError> {
        let key = property.key();
        let cell = self
            .columns
            .get(&key)
            .ok_or(ArenaError::UnknownProperty { key })?;
        let column = cell
            .try_borrow()
            .map_err(|_| ArenaError::BorrowConflict { key })?;
        Ref::filter_map(column, |c| T::slice(c).map(|s| &s[range]))
            .map_err(|_| ArenaError::UnknownProperty { key })
    }

    /// Borrow `range` of a column for writing.
    pub fn write<T: ColumnValue>(
        &self,
        property: &Property<T>,
        range: Range<usize>,
    ) -> Result<RefMut<'_, [T]>, ArenaError> {
        let key = property.key();
        let cell = self
            .columns
            .get(&key)
            .ok_or(ArenaError::UnknownProperty { key })?;
        let column = cell
            .try_borrow_mut()
            .map_err(|_| ArenaError::BorrowConflict { key })?;
        RefMut::filter_map(column, |c| T::slice_mut(c).map(|s| &mut s[range]))
            .map_err(|_| ArenaError::UnknownProperty { key })
    }

    /// Replace every column with a fresh one of `new_len` slots holding
    /// the moved ranges.
    pub fn relocate(&mut self, new_len: usize, moves: &[Move]) {
        for cell in self.columns.values_mut() {
            let column = cell.get_mut();
            *column = column.relocated(new_len, moves);
        }
        self.len = new_len;
    }

    /// Compact every column in place. See [`Column::compact`].
    pub fn compact(&mut self, moves: &[Move]) {
        for cell in self.columns.values_mut() {
            cell.get_mut().compact(moves);
        }
    }
}
