//! Errors raised by behaviors and collections.

use std::fmt;

use flare_arena::ArenaError;
use flare_core::{ErrorKind, PropertyKey};
use thiserror::Error;

/// The kind of access a collection was asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Read-only slice access.
    Read,
    /// Mutable slice access.
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "readable"),
            Self::Write => write!(f, "writable"),
        }
    }
}

/// Errors from a behavior step or a collection access.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum BehaviorError {
    /// The underlying allocator rejected the access.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// The property is outside the collection's declared sets.
    #[error("property {key} is not {access} in this collection")]
    Permission {
        /// The requested key.
        key: PropertyKey,
        /// The access that was refused.
        access: Access,
    },
    /// A behavior builder rejected its configuration.
    #[error("invalid behavior config: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
    /// The behavior could not complete its step.
    #[error("behavior failed: {reason}")]
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

impl BehaviorError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Arena(e) => e.kind(),
            Self::Permission { .. } => ErrorKind::Permission,
            Self::InvalidConfig { .. } | Self::Failed { .. } => ErrorKind::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_core::standard::VELOCITY_X;

    #[test]
    fn permission_message_names_key_and_access() {
        let err = BehaviorError::Permission {
            key: VELOCITY_X.key(),
            access: Access::Write,
        };
        assert_eq!(
            err.to_string(),
            "property VelocityX:f32 is not writable in this collection"
        );
        assert_eq!(err.kind(), ErrorKind::Permission);
    }

    #[test]
    fn invalid_config_is_configuration() {
        let err = BehaviorError::InvalidConfig {
            reason: "interval must be positive".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn arena_errors_keep_their_kind() {
        let err: BehaviorError = ArenaError::UnknownProperty {
            key: VELOCITY_X.key(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
