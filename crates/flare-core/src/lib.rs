//! Core types for the Flare particle simulation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: typed
//! property keys, property sets, reservation identifiers, the standard
//! particle properties, a small 2D vector, and the error classification
//! used across crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod property;
pub mod set;
pub mod standard;
pub mod vector;

pub use error::ErrorKind;
pub use id::ReservationId;
pub use property::{Property, PropertyKey, PropertyType, PropertyValue};
pub use set::PropertySet;
pub use vector::Vec2;
