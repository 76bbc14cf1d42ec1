//! Flare: an arena-backed 2D particle simulation core.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Flare sub-crates. Rendering is left to the host: it reads particle
//! properties straight out of the shared allocator.
//!
//! # Quick start
//!
//! ```rust
//! use flare::prelude::*;
//! use flare::types::standard::{IS_ALIVE, POSITION_X, VELOCITY_X, VELOCITY_Y};
//!
//! // A custom modifier that damps velocity every tick.
//! #[derive(Clone, Debug)]
//! struct Drag(f32);
//!
//! impl Behavior for Drag {
//!     fn name(&self) -> &str { "Drag" }
//! }
//!
//! impl Modifier for Drag {
//!     fn reads(&self) -> PropertySet { PropertySet::empty() }
//!     fn writes(&self) -> PropertySet {
//!         PropertySet::empty().with(VELOCITY_X).with(VELOCITY_Y)
//!     }
//!     fn update(
//!         &mut self,
//!         _emitter: &EmitterState,
//!         particles: &Collection<'_>,
//!         dt: f32,
//!     ) -> Result<(), BehaviorError> {
//!         let damping = (1.0 - self.0 * dt).max(0.0);
//!         for v in particles.values(&VELOCITY_X)?.iter_mut() { *v *= damping; }
//!         for v in particles.values(&VELOCITY_Y)?.iter_mut() { *v *= damping; }
//!         Ok(())
//!     }
//!     fn clone_modifier(&self) -> Box<dyn Modifier> { Box::new(self.clone()) }
//! }
//!
//! let allocator = SharedAllocator::default();
//! let trigger = TimeElapsedTrigger::builder()
//!     .interval(0.1)
//!     .particles(5, 10)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let velocity = RandomDirectionVelocityInitializer::builder()
//!     .speed(20.0, 40.0)
//!     .build()
//!     .unwrap();
//! let config = EmitterConfig::new(trigger)
//!     .max_particle_lifetime(2.0)
//!     .initializer(RandomRegionPositionInitializer::point())
//!     .initializer(velocity)
//!     .modifier(Drag(0.5))
//!     .modifier(ApplyVelocityModifier::new());
//!
//! let mut emitter = Emitter::new(&allocator, config).unwrap();
//! emitter.set_world_position(Vec2::new(320.0, 240.0));
//! for _ in 0..10 {
//!     emitter.update(1.0 / 60.0).unwrap();
//! }
//! assert!(emitter.alive_count().unwrap() >= 5);
//!
//! // Read-only access for a renderer.
//! let alloc = allocator.borrow();
//! let readable = PropertySet::empty().with(IS_ALIVE).with(POSITION_X);
//! let view = emitter.view(&alloc, &readable).unwrap();
//! let alive = view.read_only_values(&IS_ALIVE).unwrap();
//! let xs = view.read_only_values(&POSITION_X).unwrap();
//! for (_, x) in alive.iter().zip(xs.iter()).filter(|(a, _)| **a) {
//!     assert!(x.is_finite());
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `flare-core` | Property keys, property sets, standard properties, `Vec2` |
//! | [`arena`] | `flare-arena` | Allocator, reservations, property columns |
//! | [`behavior`] | `flare-behavior` | Behavior traits, collections, access plans |
//! | [`behaviors`] | `flare-behaviors` | Standard triggers, initializers, modifiers |
//! | [`engine`] | `flare-engine` | Emitters and the emitter registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and standard properties (`flare-core`).
///
/// The standard property handles live in [`types::standard`].
pub use flare_core as types;

/// Property storage and reservations (`flare-arena`).
///
/// Most users only need [`arena::SharedAllocator`], which is also in the
/// [`prelude`].
pub use flare_arena as arena;

/// Behavior traits and permission-checked collections (`flare-behavior`).
///
/// Implement [`behavior::Trigger`], [`behavior::Initializer`] or
/// [`behavior::Modifier`] to extend an emitter.
pub use flare_behavior as behavior;

/// Standard behaviors (`flare-behaviors`).
pub use flare_behaviors as behaviors;

/// Emitters and the emitter registry (`flare-engine`).
pub use flare_engine as engine;

/// Common imports for typical Flare usage.
///
/// ```rust
/// use flare::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use flare_core::{ErrorKind, Property, PropertyKey, PropertySet, Vec2};

    // Storage
    pub use flare_arena::{ArenaError, SharedAllocator};

    // Behavior traits
    pub use flare_behavior::{
        Behavior, BehaviorError, Collection, EmitterState, Initializer, Modifier, Trigger,
    };

    // Standard behaviors
    pub use flare_behaviors::{
        ApplyRotationalVelocityModifier, ApplyVelocityModifier, ConstantAccelerationModifier,
        DistanceTravelledTrigger, LinearColorInterpolationModifier,
        LinearSizeInterpolationModifier, OneShotTrigger, RandomDirectionVelocityInitializer,
        RandomRegionPositionInitializer, RandomRotationInitializer, RandomSizeInitializer,
        RandomTextureSectionInitializer, Rgba, Size, StaticColorInitializer,
        StaticSizeInitializer, TimeElapsedTrigger,
    };

    // Engine
    pub use flare_engine::{Emitter, EmitterConfig, EmitterError, EmitterRegistry};
}
