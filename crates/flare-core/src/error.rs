//! Error classification shared by every Flare crate.
//!
//! Each crate defines its own error enum; all of them map onto one of the
//! [`ErrorKind`] categories so callers can branch on the class of mistake
//! without matching every variant.

use std::fmt;

/// Broad category of a Flare error.
///
/// None of these are transient faults. They all indicate a programming or
/// configuration mistake that is expected to surface in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid construction-time configuration (e.g. an emitter without a
    /// trigger, a non-positive lifetime).
    Configuration,
    /// Access to an unregistered property or through a released reservation.
    NotFound,
    /// Property access outside a collection's declared readable/writable sets.
    Permission,
    /// A property column was borrowed in a way that conflicts with an
    /// outstanding borrow.
    Conflict,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::NotFound => write!(f, "not found"),
            Self::Permission => write!(f, "permission"),
            Self::Conflict => write!(f, "conflict"),
        }
    }
}
