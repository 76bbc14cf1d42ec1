//! Standard triggers, initializers and modifiers for Flare emitters.
//!
//! # Typical pipeline
//!
//! 1. [`TimeElapsedTrigger`] decides how many particles to emit.
//! 2. Initializers write start state for claimed slots:
//!    [`RandomRegionPositionInitializer`], [`RandomDirectionVelocityInitializer`],
//!    [`StaticSizeInitializer`], [`StaticColorInitializer`], ...
//! 3. Modifiers advance every slot each tick: [`ApplyVelocityModifier`],
//!    [`LinearSizeInterpolationModifier`], [`LinearColorInterpolationModifier`], ...
//!
//! Randomized behaviors draw from a seeded ChaCha8 generator. Cloning a
//! behavior restarts its generator from the configured seed, so every
//! emitter built from one template sees the same sequence.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod color;
pub mod motion;
pub mod position;
pub mod rotation;
pub mod size;
pub mod texture;
pub mod triggers;

mod util;

pub use color::{LinearColorInterpolationModifier, Rgba, StaticColorInitializer};
pub use motion::{
    ApplyVelocityModifier, ConstantAccelerationModifier, RandomDirectionVelocityInitializer,
};
pub use position::RandomRegionPositionInitializer;
pub use rotation::{ApplyRotationalVelocityModifier, RandomRotationInitializer};
pub use size::{LinearSizeInterpolationModifier, RandomSizeInitializer, Size, StaticSizeInitializer};
pub use texture::RandomTextureSectionInitializer;
pub use triggers::{DistanceTravelledTrigger, OneShotTrigger, TimeElapsedTrigger};
