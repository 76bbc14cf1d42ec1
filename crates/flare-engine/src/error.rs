//! Emitter error types.

use flare_arena::ArenaError;
use flare_behavior::BehaviorError;
use flare_core::{ErrorKind, ReservationId};
use thiserror::Error;

/// Errors from emitter construction and ticking.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum EmitterError {
    /// The emitter configuration failed validation.
    #[error("invalid emitter config: {reason}")]
    Configuration {
        /// Description of the problem.
        reason: String,
    },
    /// A trigger, initializer or modifier returned an error.
    #[error("behavior '{name}' failed: {source}")]
    Behavior {
        /// Name of the failing behavior.
        name: String,
        /// The underlying error.
        #[source]
        source: BehaviorError,
    },
    /// An allocator other than the emitter's own was passed in.
    #[error("allocator does not own reservation {reservation}")]
    ForeignAllocator {
        /// The emitter's reservation.
        reservation: ReservationId,
    },
    /// The allocator rejected an emitter bookkeeping operation.
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

impl EmitterError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Behavior { source, .. } => source.kind(),
            Self::ForeignAllocator { .. } => ErrorKind::NotFound,
            Self::Arena(e) => e.kind(),
        }
    }

    pub(crate) fn behavior(name: &str, source: BehaviorError) -> Self {
        Self::Behavior {
            name: name.to_string(),
            source,
        }
    }
}
