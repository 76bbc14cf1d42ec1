//! The shared allocator handle and the RAII [`Reservation`].
//!
//! [`SharedAllocator`] lets several emitters draw ranges from one property
//! store. Each [`Reservation`] releases its range when dropped or
//! explicitly disposed; the allocator may relocate the range in between
//! without invalidating the handle.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use flare_core::{Property, PropertyKey, ReservationId};
use tracing::warn;

use crate::allocator::{Allocator, IndexRange};
use crate::column::ColumnValue;
use crate::config::AllocatorConfig;
use crate::error::ArenaError;

/// Single-threaded shared ownership of an [`Allocator`].
///
/// Cloning is cheap and yields another handle to the same allocator.
#[derive(Clone)]
pub struct SharedAllocator {
    inner: Rc<RefCell<Allocator>>,
}

impl SharedAllocator {
    /// Wrap an allocator for sharing.
    pub fn new(allocator: Allocator) -> Self {
        Self {
            inner: Rc::new(RefCell::new(allocator)),
        }
    }

    /// Build from a config.
    pub fn from_config(config: AllocatorConfig) -> Result<Self, ArenaError> {
        Ok(Self::new(Allocator::new(config)?))
    }

    /// Shared allocator with `capacity` slots and default growth.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Allocator::with_capacity(capacity))
    }

    /// Borrow the allocator.
    ///
    /// # Panics
    ///
    /// Panics if the allocator is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Allocator> {
        self.inner.borrow()
    }

    /// Mutably borrow the allocator.
    ///
    /// # Panics
    ///
    /// Panics if the allocator is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Allocator> {
        self.inner.borrow_mut()
    }

    /// Borrow, failing with [`ArenaError::AllocatorBusy`] instead of
    /// panicking.
    pub fn try_borrow(&self) -> Result<Ref<'_, Allocator>, ArenaError> {
        self.inner.try_borrow().map_err(|_| ArenaError::AllocatorBusy)
    }

    /// Mutably borrow, failing with [`ArenaError::AllocatorBusy`] instead
    /// of panicking.
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, Allocator>, ArenaError> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| ArenaError::AllocatorBusy)
    }

    /// Reserve `n` slots and wrap them in an owning handle.
    pub fn reserve(&self, n: usize) -> Result<Reservation, ArenaError> {
        let id = self.try_borrow_mut()?.reserve(n)?;
        Ok(Reservation {
            allocator: self.clone(),
            id,
        })
    }

    /// Register a property column. Idempotent.
    pub fn register_property(&self, key: PropertyKey) -> Result<bool, ArenaError> {
        Ok(self.try_borrow_mut()?.register_property(key))
    }

    /// Whether both handles point at the same allocator.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for SharedAllocator {
    fn default() -> Self {
        Self::with_capacity(AllocatorConfig::DEFAULT_INITIAL_CAPACITY)
    }
}

impl fmt::Debug for SharedAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(alloc) => f
                .debug_struct("SharedAllocator")
                .field("capacity", &alloc.capacity())
                .field("free_space", &alloc.free_space())
                .field("live", &alloc.live_count())
                .finish(),
            Err(_) => f.write_str("SharedAllocator(<borrowed>)"),
        }
    }
}

/// An owning handle to one contiguous index range.
///
/// The range is released when the handle is dropped or passed to
/// [`dispose`](Reservation::dispose). Indices are looked up on every call
/// because growth and defragmentation may move the range.
pub struct Reservation {
    allocator: SharedAllocator,
    id: ReservationId,
}

impl Reservation {
    /// The allocator-level id of this range.
    pub fn id(&self) -> ReservationId {
        self.id
    }

    /// The allocator this range belongs to.
    pub fn allocator(&self) -> &SharedAllocator {
        &self.allocator
    }

    /// Current range.
    pub fn range(&self) -> Result<IndexRange, ArenaError> {
        self.allocator.try_borrow()?.range(self.id)
    }

    /// First slot of the range.
    pub fn start_index(&self) -> Result<usize, ArenaError> {
        Ok(self.range()?.start_index())
    }

    /// Last slot of the range (inclusive).
    pub fn last_used_index(&self) -> Result<usize, ArenaError> {
        Ok(self.range()?.last_used_index())
    }

    /// Number of slots.
    pub fn len(&self) -> Result<usize, ArenaError> {
        Ok(self.range()?.len())
    }

    /// Grow the range by `extra` slots at its end. See [`Allocator::expand`].
    pub fn expand(&self, extra: usize) -> Result<IndexRange, ArenaError> {
        self.allocator.try_borrow_mut()?.expand(self.id, extra)
    }

    /// Run `f` over a mutable view of `property` within this range.
    pub fn with_values<T: ColumnValue, R>(
        &self,
        property: &Property<T>,
        f: impl FnOnce(&mut [T]) -> R,
    ) -> Result<R, ArenaError> {
        let alloc = self.allocator.try_borrow()?;
        let mut values = alloc.values(self.id, property)?;
        Ok(f(&mut *values))
    }

    /// Run `f` over a read-only view of `property` within this range.
    pub fn with_read_only_values<T: ColumnValue, R>(
        &self,
        property: &Property<T>,
        f: impl FnOnce(&[T]) -> R,
    ) -> Result<R, ArenaError> {
        let alloc = self.allocator.try_borrow()?;
        let values = alloc.read_only_values(self.id, property)?;
        Ok(f(&*values))
    }

    /// Release the range now.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        match self.allocator.try_borrow_mut() {
            Ok(mut alloc) => {
                // Err here means it was already released through the raw API.
                let _ = alloc.release(self.id);
            }
            Err(_) => warn!(
                reservation = %self.id,
                "allocator borrowed during drop; reservation leaked until allocator is dropped"
            ),
        }
    }
}

impl fmt::Debug for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reservation")
            .field("id", &self.id)
            .field("range", &self.range().ok())
            .finish()
    }
}
