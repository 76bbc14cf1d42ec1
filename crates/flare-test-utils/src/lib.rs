//! Test utilities and mock behaviors for Flare development.
//!
//! [`ParticleFixture`] owns an allocator with one reservation and runs a
//! single behavior against it, so behaviors can be tested without an
//! emitter. The [`fixtures`] module provides mock triggers, initializers
//! and modifiers for emitter tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    ConstantInitializer, FailingModifier, FixedCountTrigger, Observation, RecordingModifier,
    UndeclaredWriteModifier,
};

use flare_arena::{Allocator, ColumnValue};
use flare_behavior::{BehaviorError, Collection, EmitterState, Initializer, Modifier};
use flare_core::standard::emitter_properties;
use flare_core::{Property, PropertySet, ReservationId};

/// An allocator holding exactly one reservation of `count` slots.
///
/// The emitter bookkeeping properties are always registered, plus any
/// extras passed to [`new`](ParticleFixture::new). Every slot starts dead
/// with all numeric columns zeroed.
pub struct ParticleFixture {
    allocator: Allocator,
    id: ReservationId,
}

impl ParticleFixture {
    pub fn new(count: usize, properties: &PropertySet) -> Self {
        let mut allocator = Allocator::with_capacity(count);
        for key in emitter_properties().union(properties).iter() {
            allocator.register_property(*key);
        }
        let id = allocator
            .reserve(count)
            .unwrap_or_else(|e| panic!("fixture reservation of {count} slots failed: {e}"));
        Self { allocator, id }
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    /// A collection over the whole reservation.
    pub fn collection<'a>(
        &'a self,
        readable: &'a PropertySet,
        writable: &'a PropertySet,
    ) -> Collection<'a> {
        Collection::new(&self.allocator, self.id, readable, writable)
            .unwrap_or_else(|e| panic!("fixture collection failed: {e}"))
    }

    /// Overwrite the leading slots of `property` with `values`.
    pub fn set<T: ColumnValue + Copy>(&self, property: &Property<T>, values: &[T]) {
        let mut column = self.column_mut(property);
        column[..values.len()].copy_from_slice(values);
    }

    /// Overwrite every slot of `property` with `value`.
    pub fn fill<T: ColumnValue + Copy>(&self, property: &Property<T>, value: T) {
        self.column_mut(property).fill(value);
    }

    /// Copy out every slot of `property`.
    pub fn get<T: ColumnValue + Copy>(&self, property: &Property<T>) -> Vec<T> {
        self.allocator
            .read_only_values(self.id, property)
            .unwrap_or_else(|e| panic!("fixture read failed: {e}"))
            .to_vec()
    }

    /// Run `initializer` with a write-only collection scoped to its writes.
    pub fn initialize(
        &self,
        initializer: &mut dyn Initializer,
        emitter: &EmitterState,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let readable = PropertySet::empty();
        let writable = initializer.writes();
        let collection = Collection::new(&self.allocator, self.id, &readable, &writable)?;
        initializer.initialize(emitter, &collection, new_indices)
    }

    /// Run `modifier` with a collection scoped to its reads and writes.
    pub fn modify(
        &self,
        modifier: &mut dyn Modifier,
        emitter: &EmitterState,
        dt: f32,
    ) -> Result<(), BehaviorError> {
        let readable = modifier.reads();
        let writable = modifier.writes();
        let collection = Collection::new(&self.allocator, self.id, &readable, &writable)?;
        modifier.update(emitter, &collection, dt)
    }

    fn column_mut<T: ColumnValue>(&self, property: &Property<T>) -> std::cell::RefMut<'_, [T]> {
        self.allocator
            .values(self.id, property)
            .unwrap_or_else(|e| panic!("fixture write failed: {e}"))
    }
}

/// `|a - b| <= 1e-4`, for comparing accumulated f32 arithmetic.
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-4
}
