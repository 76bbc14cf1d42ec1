//! The permissioned [`Collection`] view over one reservation.
//!
//! A collection pairs a reservation with two explicit property sets. Every
//! slice request is checked against the matching set before it reaches
//! the allocator, so a behavior can only touch what it declared.

use std::cell::{Ref, RefMut};

use flare_arena::{Allocator, ColumnValue};
use flare_core::{Property, PropertySet, ReservationId};

use crate::error::{Access, BehaviorError};

/// Read/write-scoped access to the particles of one reservation.
///
/// Slices are borrowed from the allocator's columns, not from the
/// collection, so several slices of distinct properties may be held at
/// once. Borrowing the same column mutably twice fails with
/// [`ArenaError::BorrowConflict`](flare_arena::ArenaError::BorrowConflict).
#[derive(Debug, Clone, Copy)]
pub struct Collection<'a> {
    allocator: &'a Allocator,
    reservation: ReservationId,
    readable: &'a PropertySet,
    writable: &'a PropertySet,
    count: usize,
}

impl<'a> Collection<'a> {
    /// Scope `reservation` to the given sets.
    ///
    /// Fails if the reservation has been released.
    pub fn new(
        allocator: &'a Allocator,
        reservation: ReservationId,
        readable: &'a PropertySet,
        writable: &'a PropertySet,
    ) -> Result<Self, BehaviorError> {
        let count = allocator.range(reservation)?.len();
        Ok(Self {
            allocator,
            reservation,
            readable,
            writable,
            count,
        })
    }

    /// Number of slots in the reservation, alive or dead.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The reservation this collection views.
    pub fn reservation(&self) -> ReservationId {
        self.reservation
    }

    /// Properties available through [`read_only_values`](Self::read_only_values).
    pub fn readable(&self) -> &PropertySet {
        self.readable
    }

    /// Properties available through [`values`](Self::values).
    pub fn writable(&self) -> &PropertySet {
        self.writable
    }

    /// Mutable slice of `property`, one entry per slot.
    pub fn values<T: ColumnValue>(
        &self,
        property: &Property<T>,
    ) -> Result<RefMut<'a, [T]>, BehaviorError> {
        let key = property.key();
        if !self.writable.contains(&key) {
            return Err(BehaviorError::Permission {
                key,
                access: Access::Write,
            });
        }
        Ok(self.allocator.values(self.reservation, property)?)
    }

    /// Read-only slice of `property`, one entry per slot.
    pub fn read_only_values<T: ColumnValue>(
        &self,
        property: &Property<T>,
    ) -> Result<Ref<'a, [T]>, BehaviorError> {
        let key = property.key();
        if !self.readable.contains(&key) {
            return Err(BehaviorError::Permission {
                key,
                access: Access::Read,
            });
        }
        Ok(self.allocator.read_only_values(self.reservation, property)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_arena::ArenaError;
    use flare_core::standard::{IS_ALIVE, POSITION_X, POSITION_Y, VELOCITY_X};
    use flare_core::ErrorKind;

    fn allocator() -> (Allocator, ReservationId) {
        let mut alloc = Allocator::with_capacity(8);
        for key in [IS_ALIVE.key(), POSITION_X.key(), VELOCITY_X.key()] {
            alloc.register_property(key);
        }
        alloc.reserve(2).unwrap();
        let id = alloc.reserve(4).unwrap();
        (alloc, id)
    }

    #[test]
    fn count_is_reservation_length() {
        let (alloc, id) = allocator();
        let none = PropertySet::empty();
        let collection = Collection::new(&alloc, id, &none, &none).unwrap();
        assert_eq!(collection.count(), 4);
    }

    #[test]
    fn writes_land_in_reservation_range() {
        let (alloc, id) = allocator();
        let readable = PropertySet::empty().with(VELOCITY_X);
        let writable = PropertySet::empty().with(POSITION_X);
        let collection = Collection::new(&alloc, id, &readable, &writable).unwrap();

        alloc.values(id, &VELOCITY_X).unwrap().fill(2.0);
        {
            let velocity = collection.read_only_values(&VELOCITY_X).unwrap();
            let mut position = collection.values(&POSITION_X).unwrap();
            for (p, v) in position.iter_mut().zip(velocity.iter()) {
                *p += v * 0.5;
            }
        }

        let start = alloc.range(id).unwrap().start_index();
        assert_eq!(start, 2);
        assert_eq!(&alloc.read_only_values(id, &POSITION_X).unwrap()[..], &[1.0; 4]);
    }

    #[test]
    fn undeclared_write_is_refused() {
        let (alloc, id) = allocator();
        let readable = PropertySet::empty().with(POSITION_X);
        let writable = PropertySet::empty();
        let collection = Collection::new(&alloc, id, &readable, &writable).unwrap();

        let err = collection.values(&POSITION_X).unwrap_err();
        assert_eq!(
            err,
            BehaviorError::Permission {
                key: POSITION_X.key(),
                access: Access::Write
            }
        );
        assert_eq!(err.kind(), ErrorKind::Permission);
    }

    #[test]
    fn writable_does_not_imply_readable() {
        let (alloc, id) = allocator();
        let readable = PropertySet::empty();
        let writable = PropertySet::empty().with(IS_ALIVE);
        let collection = Collection::new(&alloc, id, &readable, &writable).unwrap();
        assert!(matches!(
            collection.read_only_values(&IS_ALIVE),
            Err(BehaviorError::Permission { access: Access::Read, .. })
        ));
    }

    #[test]
    fn declared_but_unregistered_is_not_found() {
        let (alloc, id) = allocator();
        let readable = PropertySet::empty().with(POSITION_Y);
        let writable = PropertySet::empty();
        let collection = Collection::new(&alloc, id, &readable, &writable).unwrap();
        let err = collection.read_only_values(&POSITION_Y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn released_reservation_is_not_found() {
        let (mut alloc, id) = allocator();
        alloc.release(id).unwrap();
        let none = PropertySet::empty();
        let err = Collection::new(&alloc, id, &none, &none).unwrap_err();
        assert_eq!(err, BehaviorError::Arena(ArenaError::ReleasedReservation { id }));
    }

    #[test]
    fn aliasing_a_column_mutably_is_a_conflict() {
        let (alloc, id) = allocator();
        let readable = PropertySet::empty().with(POSITION_X);
        let writable = PropertySet::empty().with(POSITION_X);
        let collection = Collection::new(&alloc, id, &readable, &writable).unwrap();
        let _held = collection.values(&POSITION_X).unwrap();
        let err = collection.read_only_values(&POSITION_X).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
