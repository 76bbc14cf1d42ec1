//! Behavior traits and permissioned particle collections for Flare.
//!
//! The [`Trigger`], [`Initializer`] and [`Modifier`] traits are the three
//! pluggable stages of an emitter tick. Each behavior declares the
//! properties it touches; those declarations are collected once into an
//! [`AccessPlan`] and enforced on every access through a [`Collection`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod access;
pub mod behavior;
pub mod collection;
pub mod error;
pub mod state;

pub use access::{AccessPlan, BehaviorAccess};
pub use behavior::{Behavior, Initializer, Modifier, Trigger};
pub use collection::Collection;
pub use error::{Access, BehaviorError};
pub use state::EmitterState;
