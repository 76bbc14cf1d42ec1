//! Arena-specific error types.

use flare_core::{ErrorKind, PropertyKey, ReservationId};
use thiserror::Error;

/// Errors that can occur during allocator and property-store operations.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A property key that has never been registered with the allocator.
    #[error("property {key} is not registered")]
    UnknownProperty {
        /// The unrecognised key.
        key: PropertyKey,
    },
    /// Access through a reservation that has been released.
    #[error("reservation {id} has been released")]
    ReleasedReservation {
        /// The stale id.
        id: ReservationId,
    },
    /// A reservation of zero slots was requested.
    #[error("cannot reserve zero slots")]
    EmptyReservation,
    /// The column is already borrowed in a conflicting way (e.g. two
    /// simultaneous mutable borrows of the same property).
    #[error("property {key} is already borrowed")]
    BorrowConflict {
        /// The contested key.
        key: PropertyKey,
    },
    /// The shared allocator is borrowed elsewhere and cannot be mutated.
    #[error("allocator is borrowed and cannot be mutated")]
    AllocatorBusy,
    /// The allocator configuration failed validation.
    #[error("invalid allocator config: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl ArenaError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownProperty { .. } | Self::ReleasedReservation { .. } => ErrorKind::NotFound,
            Self::BorrowConflict { .. } | Self::AllocatorBusy => ErrorKind::Conflict,
            Self::EmptyReservation | Self::InvalidConfig { .. } => ErrorKind::Configuration,
        }
    }
}
