//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one reservation inside an allocator.
///
/// The `generation` is bumped every time a slot in the allocator's
/// reservation table is released, so an id kept after release never
/// resolves to a later reservation that reuses the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReservationId {
    index: u32,
    generation: u32,
}

impl ReservationId {
    /// Build an id from its table slot and generation.
    ///
    /// Typically called by the allocator, not by user code.
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot in the allocator's reservation table.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.index, self.generation)
    }
}
