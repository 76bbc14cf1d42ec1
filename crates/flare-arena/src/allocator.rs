//! The index-range [`Allocator`].
//!
//! Manages non-overlapping contiguous ranges over the [`PropertyStore`].
//! The lifecycle of a range is:
//! 1. `reserve(n)`: first-fit into a gap, defragmenting or growing when no
//!    single gap fits.
//! 2. Typed access via `values()` / `read_only_values()`, bounded to the range.
//! 3. Optional `expand(id, extra)`: grow the range in place, relocating it
//!    to the end of the live region when the adjoining gap is too small.
//! 4. `release(id)`: the range returns to the free pool immediately, with
//!    its values left as they were.
//!
//! Invariant: `sum(live lengths) + free_space == capacity`, always.

use std::cell::{Ref, RefMut};
use std::ops::Range;

use flare_core::{Property, PropertyKey, ReservationId};
use tracing::debug;

use crate::column::{ColumnValue, Move};
use crate::config::AllocatorConfig;
use crate::error::ArenaError;
use crate::store::PropertyStore;

/// A live reservation's slot range. Never empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRange {
    start: usize,
    len: usize,
}

impl IndexRange {
    /// First slot of the range.
    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Last slot of the range (inclusive).
    pub fn last_used_index(&self) -> usize {
        self.start + self.len - 1
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: reservations hold at least one slot.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last slot.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// As a `start..end` range.
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Whether the two ranges share any slot.
    pub fn overlaps(&self, other: &IndexRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Counters for the expensive relocation paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Number of capacity growths.
    pub growths: u64,
    /// Number of in-place defragmentations.
    pub defrags: u64,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    range: Option<IndexRange>,
}

/// Owns the property store and hands out non-overlapping index ranges.
///
/// Ranges are addressed by [`ReservationId`]. The allocator may move a
/// range's data during growth or defragmentation; the id stays valid until
/// [`release`](Allocator::release).
#[derive(Debug)]
pub struct Allocator {
    config: AllocatorConfig,
    capacity: usize,
    free_space: usize,
    store: PropertyStore,
    /// Reservation table, indexed by `ReservationId::index`.
    slots: Vec<Slot>,
    /// Table entries available for reuse.
    vacant: Vec<u32>,
    /// Live reservations, ascending by start index.
    live: Vec<ReservationId>,
    stats: AllocatorStats,
}

impl Allocator {
    /// Create an allocator from a validated config.
    pub fn new(config: AllocatorConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let capacity = config.initial_capacity;
        Ok(Self {
            config,
            capacity,
            free_space: capacity,
            store: PropertyStore::new(capacity),
            slots: Vec::new(),
            vacant: Vec::new(),
            live: Vec::new(),
            stats: AllocatorStats::default(),
        })
    }

    /// Create an allocator with `capacity` slots and default growth.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            config: AllocatorConfig::new(capacity),
            capacity,
            free_space: capacity,
            store: PropertyStore::new(capacity),
            slots: Vec::new(),
            vacant: Vec::new(),
            live: Vec::new(),
            stats: AllocatorStats::default(),
        }
    }

    // ── Introspection ──────────────────────────────────────────────

    /// Slots per property column.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not covered by any live reservation.
    pub fn free_space(&self) -> usize {
        self.free_space
    }

    /// Slots covered by live reservations.
    pub fn used(&self) -> usize {
        self.capacity - self.free_space
    }

    /// Number of live reservations.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Growth and defragmentation counters.
    pub fn stats(&self) -> AllocatorStats {
        self.stats
    }

    /// The configuration this allocator was built with.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Current range of a live reservation.
    pub fn range(&self, id: ReservationId) -> Result<IndexRange, ArenaError> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.range)
            .ok_or(ArenaError::ReleasedReservation { id })
    }

    /// Whether `id` refers to a live reservation.
    pub fn is_live(&self, id: ReservationId) -> bool {
        self.range(id).is_ok()
    }

    /// Live reservations and their ranges, ascending by start index.
    pub fn live_ranges(&self) -> impl Iterator<Item = (ReservationId, IndexRange)> + '_ {
        self.live.iter().filter_map(|&id| Some((id, self.range(id).ok()?)))
    }

    // ── Properties ─────────────────────────────────────────────────

    /// Register a property column. Idempotent; existing values survive.
    ///
    /// Returns `true` if a column was created.
    pub fn register_property(&mut self, key: PropertyKey) -> bool {
        self.store.register(key)
    }

    /// Whether `key` has a column.
    pub fn is_registered(&self, key: &PropertyKey) -> bool {
        self.store.contains(key)
    }

    /// Number of registered columns.
    pub fn property_count(&self) -> usize {
        self.store.property_count()
    }

    /// Mutable typed view of `property` over the reservation's range.
    pub fn values<T: ColumnValue>(
        &self,
        id: ReservationId,
        property: &Property<T>,
    ) -> Result<RefMut<'_, [T]>, ArenaError> {
        let range = self.range(id)?;
        self.store.write(property, range.as_range())
    }

    /// Read-only typed view of `property` over the reservation's range.
    pub fn read_only_values<T: ColumnValue>(
        &self,
        id: ReservationId,
        property: &Property<T>,
    ) -> Result<Ref<'_, [T]>, ArenaError> {
        let range = self.range(id)?;
        self.store.read(property, range.as_range())
    }

    // ── Reservation lifecycle ──────────────────────────────────────

    /// Reserve `n` contiguous slots.
    ///
    /// Grows capacity when `n` exceeds the free space. When enough space
    /// exists but no single gap fits, defragments if the space left after
    /// this request could satisfy another request of the same size, and
    /// grows otherwise.
    pub fn reserve(&mut self, n: usize) -> Result<ReservationId, ArenaError> {
        if n == 0 {
            return Err(ArenaError::EmptyReservation);
        }
        if n > self.free_space {
            let target = self.growth_target(n);
            self.grow(target, None);
        }
        let start = match self.first_fit(n) {
            Some(start) => start,
            None => {
                if self.free_space - n >= n {
                    self.relayout(self.capacity, None);
                    self.stats.defrags += 1;
                    debug!(
                        capacity = self.capacity,
                        live = self.live.len(),
                        requested = n,
                        "defragmented allocator"
                    );
                } else {
                    let target = self.growth_target(n);
                    self.grow(target, None);
                }
                // Compaction leaves all free space in one tail gap.
                self.used()
            }
        };
        Ok(self.insert_live(start, n))
    }

    /// Grow a live reservation by `extra` slots at its end.
    ///
    /// Extends in place when the dead gap after the range is large enough.
    /// Otherwise the reservation is moved to the end of the live region,
    /// by defragmenting when total free space suffices or by growing
    /// capacity when it does not. Existing values move with the range.
    pub fn expand(&mut self, id: ReservationId, extra: usize) -> Result<IndexRange, ArenaError> {
        let range = self.range(id)?;
        if extra == 0 {
            return Ok(range);
        }
        if self.gap_after(id, range) < extra {
            if self.free_space >= extra {
                self.relayout(self.capacity, Some(id));
                self.stats.defrags += 1;
                debug!(
                    capacity = self.capacity,
                    live = self.live.len(),
                    reservation = %id,
                    "defragmented allocator to expand reservation"
                );
            } else {
                let target = self.growth_target(extra);
                self.grow(target, Some(id));
            }
        }
        let slot = &mut self.slots[id.index() as usize];
        let Some(range) = slot.range.as_mut() else {
            return Err(ArenaError::ReleasedReservation { id });
        };
        range.len += extra;
        let expanded = *range;
        self.free_space -= extra;
        Ok(expanded)
    }

    /// Release a reservation's range back to the free pool.
    ///
    /// The slots are not cleared. The id, and every copy of it, becomes
    /// stale.
    pub fn release(&mut self, id: ReservationId) -> Result<IndexRange, ArenaError> {
        let range = self.range(id)?;
        let slot = &mut self.slots[id.index() as usize];
        slot.range = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index());
        if let Some(pos) = self.live.iter().position(|&l| l == id) {
            self.live.remove(pos);
        }
        self.free_space += range.len();
        Ok(range)
    }

    // ── Relocation ─────────────────────────────────────────────────

    /// Grow every column to `new_capacity` slots, compacting live ranges
    /// to the front in ascending order.
    ///
    /// Does nothing if `new_capacity` is not larger than the current
    /// capacity.
    pub fn expand_capacity(&mut self, new_capacity: usize) {
        self.grow(new_capacity, None);
    }

    /// Compact live ranges to the front without changing capacity.
    ///
    /// With `move_to_end`, that reservation is placed after all the others
    /// so it can be expanded in place immediately afterwards.
    pub fn defrag(&mut self, move_to_end: Option<ReservationId>) -> Result<(), ArenaError> {
        if let Some(id) = move_to_end {
            self.range(id)?;
        }
        self.relayout(self.capacity, move_to_end);
        self.stats.defrags += 1;
        debug!(
            capacity = self.capacity,
            live = self.live.len(),
            "defragmented allocator"
        );
        Ok(())
    }

    fn grow(&mut self, new_capacity: usize, move_to_end: Option<ReservationId>) {
        if new_capacity <= self.capacity {
            return;
        }
        let old_capacity = self.capacity;
        self.relayout(new_capacity, move_to_end);
        self.free_space += new_capacity - old_capacity;
        self.capacity = new_capacity;
        self.stats.growths += 1;
        debug!(
            old_capacity,
            new_capacity,
            properties = self.store.property_count(),
            live = self.live.len(),
            "grew allocator capacity"
        );
    }

    /// Capacity that fits `extra` more slots with the configured margin.
    fn growth_target(&self, extra: usize) -> usize {
        let factor = self.config.growth_factor;
        let scaled = |n: usize| (n as f64 * factor).ceil() as usize;
        let required = self.used() + extra;
        scaled(self.capacity)
            .max(scaled(required))
            .max(required)
            .max(self.capacity + 1)
    }

    /// Pack live ranges from slot 0 into columns of `new_capacity` slots.
    ///
    /// Ranges keep ascending order except `move_to_end`, which goes last.
    /// Plain compaction at unchanged capacity runs in place; everything
    /// else copies into fresh columns.
    fn relayout(&mut self, new_capacity: usize, move_to_end: Option<ReservationId>) {
        if let Some(target) = move_to_end {
            if let Some(pos) = self.live.iter().position(|&l| l == target) {
                self.live.remove(pos);
                self.live.push(target);
            }
        }

        let mut moves = Vec::with_capacity(self.live.len());
        let mut cursor = 0;
        for &id in &self.live {
            let slot = &mut self.slots[id.index() as usize];
            if let Some(range) = slot.range.as_mut() {
                moves.push(Move {
                    src: range.start,
                    dst: cursor,
                    len: range.len,
                });
                range.start = cursor;
                cursor += range.len;
            }
        }

        if new_capacity == self.capacity && move_to_end.is_none() {
            self.store.compact(&moves);
        } else {
            self.store.relocate(new_capacity, &moves);
        }
    }

    // ── Internals ──────────────────────────────────────────────────

    fn first_fit(&self, n: usize) -> Option<usize> {
        let mut cursor = 0;
        for (_, range) in self.live_ranges() {
            if range.start - cursor >= n {
                return Some(cursor);
            }
            cursor = range.end();
        }
        (self.capacity - cursor >= n).then_some(cursor)
    }

    fn gap_after(&self, id: ReservationId, range: IndexRange) -> usize {
        let next_start = self
            .live
            .iter()
            .position(|&l| l == id)
            .and_then(|pos| self.live.get(pos + 1))
            .and_then(|&next| self.range(next).ok())
            .map_or(self.capacity, |next| next.start);
        next_start - range.end()
    }

    fn insert_live(&mut self, start: usize, n: usize) -> ReservationId {
        let range = Some(IndexRange { start, len: n });
        let id = match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.range = range;
                ReservationId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    range,
                });
                ReservationId::new(self.slots.len() as u32 - 1, 0)
            }
        };
        let pos = self.live.partition_point(|&l| {
            self.slots[l.index() as usize]
                .range
                .is_some_and(|r| r.start < start)
        });
        self.live.insert(pos, id);
        self.free_space -= n;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_core::standard::{IS_ALIVE, POSITION_X};

    fn assert_invariants(alloc: &Allocator) {
        let ranges: Vec<_> = alloc.live_ranges().map(|(_, r)| r).collect();
        let used: usize = ranges.iter().map(|r| r.len()).sum();
        assert_eq!(used + alloc.free_space(), alloc.capacity());
        for (i, a) in ranges.iter().enumerate() {
            assert!(a.end() <= alloc.capacity());
            for b in &ranges[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
                assert!(a.start_index() < b.start_index(), "live list out of order");
            }
        }
    }

    #[test]
    fn reserve_within_capacity() {
        let mut alloc = Allocator::with_capacity(10);
        let id = alloc.reserve(7).unwrap();
        let range = alloc.range(id).unwrap();
        assert_eq!(range.start_index(), 0);
        assert_eq!(range.last_used_index(), 6);
        assert_eq!(range.len(), 7);
        assert_eq!(alloc.free_space(), 3);
        assert_invariants(&alloc);
    }

    #[test]
    fn reserve_beyond_capacity_grows_once() {
        let mut alloc = Allocator::with_capacity(10);
        let id = alloc.reserve(11).unwrap();
        let range = alloc.range(id).unwrap();
        assert!(alloc.capacity() > 10);
        assert_eq!(range.start_index(), 0);
        assert_eq!(range.last_used_index(), 10);
        assert_eq!(range.len(), 11);
        assert_eq!(alloc.stats().growths, 1);
        assert_invariants(&alloc);
    }

    #[test]
    fn consecutive_reservations_are_adjacent() {
        let mut alloc = Allocator::with_capacity(10);
        alloc.reserve(5).unwrap();
        let id = alloc.reserve(3).unwrap();
        let second = alloc.range(id).unwrap();
        assert_eq!(second.start_index(), 5);
        assert_eq!(second.last_used_index(), 7);
    }

    #[test]
    fn released_range_is_reused() {
        let mut alloc = Allocator::with_capacity(10);
        let first = alloc.reserve(5).unwrap();
        alloc.release(first).unwrap();
        let id = alloc.reserve(5).unwrap();
        let again = alloc.range(id).unwrap();
        assert_eq!(again.start_index(), 0);
        assert_eq!(again.last_used_index(), 4);
        assert_eq!(alloc.capacity(), 10);
    }

    #[test]
    fn fragmented_reserve_defragments_without_growth() {
        let mut alloc = Allocator::with_capacity(15);
        let ids: Vec<_> = [3, 2, 3, 2, 3]
            .into_iter()
            .map(|n| alloc.reserve(n).unwrap())
            .collect();
        alloc.release(ids[1]).unwrap();
        alloc.release(ids[3]).unwrap();

        alloc.reserve(3).unwrap();

        assert_eq!(alloc.capacity(), 15);
        assert_eq!(alloc.stats().defrags, 1);
        assert_eq!(alloc.stats().growths, 0);
        let survivors: Vec<_> = [ids[0], ids[2], ids[4]]
            .iter()
            .map(|&id| alloc.range(id).unwrap())
            .collect();
        assert_eq!(survivors[0].start_index(), 0);
        assert_eq!(survivors[1].start_index(), 3);
        assert_eq!(survivors[2].start_index(), 6);
        let starts: Vec<_> = alloc.live_ranges().map(|(_, r)| r.start_index()).collect();
        assert_eq!(starts, vec![0, 3, 6, 9]);
        assert_invariants(&alloc);
    }

    #[test]
    fn fragmented_reserve_grows_when_remaining_space_is_tight() {
        // 10 slots: [a:4][gap 2][b:2][gap 2]. Free = 4, request 3 leaves
        // 1 < 3, so the allocator grows instead of defragmenting.
        let mut alloc = Allocator::with_capacity(10);
        let a = alloc.reserve(4).unwrap();
        let gap = alloc.reserve(2).unwrap();
        let b = alloc.reserve(2).unwrap();
        alloc.release(gap).unwrap();

        alloc.reserve(3).unwrap();

        // max(ceil(10 × 1.2), ceil(9 × 1.2)) with no f32 rounding drift.
        assert_eq!(alloc.capacity(), 12);
        assert_eq!(alloc.stats().growths, 1);
        assert_eq!(alloc.stats().defrags, 0);
        assert_eq!(alloc.range(a).unwrap().start_index(), 0);
        assert_eq!(alloc.range(b).unwrap().start_index(), 4);
        assert_invariants(&alloc);
    }

    #[test]
    fn growth_preserves_values() {
        let mut alloc = Allocator::with_capacity(4);
        alloc.register_property(POSITION_X.key());
        let gap = alloc.reserve(1).unwrap();
        let id = alloc.reserve(3).unwrap();
        alloc.values(id, &POSITION_X).unwrap().copy_from_slice(&[1.0, 2.0, 3.0]);
        alloc.release(gap).unwrap();

        alloc.reserve(4).unwrap();

        assert_eq!(alloc.range(id).unwrap().start_index(), 0);
        assert_eq!(&alloc.read_only_values(id, &POSITION_X).unwrap()[..], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn expand_in_place_when_gap_follows() {
        let mut alloc = Allocator::with_capacity(10);
        let id = alloc.reserve(4).unwrap();
        let range = alloc.expand(id, 3).unwrap();
        assert_eq!(range.start_index(), 0);
        assert_eq!(range.len(), 7);
        assert_eq!(alloc.free_space(), 3);
        assert_eq!(alloc.stats(), AllocatorStats::default());
    }

    #[test]
    fn expand_moves_reservation_to_end_when_blocked() {
        let mut alloc = Allocator::with_capacity(10);
        alloc.register_property(POSITION_X.key());
        let first = alloc.reserve(3).unwrap();
        let second = alloc.reserve(3).unwrap();
        alloc.values(first, &POSITION_X).unwrap().fill(5.0);

        let range = alloc.expand(first, 4).unwrap();

        assert_eq!(alloc.capacity(), 10);
        assert_eq!(alloc.range(second).unwrap().start_index(), 0);
        assert_eq!(range.start_index(), 3);
        assert_eq!(range.len(), 7);
        let values = alloc.read_only_values(first, &POSITION_X).unwrap();
        assert_eq!(&values[..3], &[5.0, 5.0, 5.0]);
        drop(values);
        assert_invariants(&alloc);
    }

    #[test]
    fn expand_grows_capacity_when_space_runs_out() {
        let mut alloc = Allocator::with_capacity(6);
        let first = alloc.reserve(3).unwrap();
        let second = alloc.reserve(3).unwrap();

        let range = alloc.expand(first, 2).unwrap();

        assert!(alloc.capacity() >= 8);
        assert_eq!(alloc.range(second).unwrap().start_index(), 0);
        assert_eq!(range.start_index(), 3);
        assert_eq!(range.len(), 5);
        assert_invariants(&alloc);
    }

    #[test]
    fn released_id_is_not_found() {
        let mut alloc = Allocator::with_capacity(4);
        alloc.register_property(IS_ALIVE.key());
        let id = alloc.reserve(2).unwrap();
        alloc.release(id).unwrap();

        assert_eq!(
            alloc.values(id, &IS_ALIVE).unwrap_err(),
            ArenaError::ReleasedReservation { id }
        );
        assert!(alloc.release(id).is_err());
        // Reusing the table slot does not revive the old id.
        let fresh = alloc.reserve(2).unwrap();
        assert_eq!(fresh.index(), id.index());
        assert!(!alloc.is_live(id));
    }

    #[test]
    fn unregistered_property_is_not_found() {
        let mut alloc = Allocator::with_capacity(4);
        let id = alloc.reserve(2).unwrap();
        assert!(matches!(
            alloc.read_only_values(id, &POSITION_X),
            Err(ArenaError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn released_slots_keep_stale_values() {
        let mut alloc = Allocator::with_capacity(4);
        alloc.register_property(POSITION_X.key());
        let old = alloc.reserve(4).unwrap();
        alloc.values(old, &POSITION_X).unwrap().fill(9.0);
        alloc.release(old).unwrap();

        let new = alloc.reserve(4).unwrap();
        assert_eq!(&alloc.read_only_values(new, &POSITION_X).unwrap()[..], &[9.0; 4]);
    }

    #[test]
    fn zero_sized_reservation_rejected() {
        let mut alloc = Allocator::with_capacity(4);
        assert_eq!(alloc.reserve(0), Err(ArenaError::EmptyReservation));
    }

    #[test]
    fn reserve_from_zero_capacity() {
        let mut alloc = Allocator::new(AllocatorConfig::new(0)).unwrap();
        let id = alloc.reserve(1).unwrap();
        assert_eq!(alloc.range(id).unwrap().len(), 1);
        assert!(alloc.capacity() >= 1);
        assert_invariants(&alloc);
    }

    #[test]
    fn defrag_with_released_target_errors() {
        let mut alloc = Allocator::with_capacity(4);
        let id = alloc.reserve(1).unwrap();
        alloc.release(id).unwrap();
        assert!(alloc.defrag(Some(id)).is_err());
    }

    #[test]
    fn expand_capacity_ignores_shrink_requests() {
        let mut alloc = Allocator::with_capacity(8);
        alloc.expand_capacity(4);
        assert_eq!(alloc.capacity(), 8);
        assert_eq!(alloc.stats().growths, 0);
    }
}
