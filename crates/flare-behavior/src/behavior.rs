//! The [`Trigger`], [`Initializer`] and [`Modifier`] traits.
//!
//! Behaviors are the pluggable stages of an emitter tick. Each one declares
//! the properties it touches once, at emitter construction, and is then
//! handed a [`Collection`] scoped to exactly those properties.
//!
//! Behaviors are authored once and instantiated per emitter through the
//! `clone_*` methods. A clone keeps the configuration and drops any
//! accumulated runtime state, so emitters never share mutable state.

use std::any::Any;
use std::fmt;

use flare_core::PropertySet;

use crate::collection::Collection;
use crate::error::BehaviorError;
use crate::state::EmitterState;

/// Common surface of every behavior.
///
/// `Any` is a supertrait so a `&dyn Trigger` (or initializer, modifier) can
/// be upcast to `&dyn Any` and downcast to its concrete type.
pub trait Behavior: Any + fmt::Debug {
    /// Human-readable name for error reporting and logs.
    fn name(&self) -> &str;
}

/// Decides how many particles to emit each tick.
pub trait Trigger: Behavior {
    /// Smallest count returned when the trigger fires (inclusive).
    fn min_particles(&self) -> u32;

    /// Largest count returned when the trigger fires (inclusive).
    fn max_particles(&self) -> u32;

    /// Particles to emit this tick, or 0.
    ///
    /// Internal accumulators (elapsed time, distance) reset whenever the
    /// trigger fires. A trigger may switch emission off through `emitter`.
    fn determine_count(&mut self, emitter: &mut EmitterState, dt: f32) -> u32;

    /// Independent copy with the same configuration and fresh runtime state.
    fn clone_trigger(&self) -> Box<dyn Trigger>;
}

/// Sets up newly claimed particles.
///
/// # Contract
///
/// `initialize()` must write every property in `writes()` for every index
/// in `new_indices`. Claimed slots are reused without clearing and still
/// hold the values of whichever particle occupied them last.
///
/// # Examples
///
/// ```
/// use flare_behavior::{Behavior, BehaviorError, Collection, EmitterState, Initializer};
/// use flare_core::standard::TEXTURE_SECTION_INDEX;
/// use flare_core::PropertySet;
///
/// #[derive(Clone, Debug)]
/// struct FixedTexture(i32);
///
/// impl Behavior for FixedTexture {
///     fn name(&self) -> &str { "fixed_texture" }
/// }
///
/// impl Initializer for FixedTexture {
///     fn writes(&self) -> PropertySet {
///         PropertySet::empty().with(TEXTURE_SECTION_INDEX)
///     }
///
///     fn initialize(
///         &mut self,
///         _emitter: &EmitterState,
///         particles: &Collection<'_>,
///         new_indices: &[usize],
///     ) -> Result<(), BehaviorError> {
///         let mut section = particles.values(&TEXTURE_SECTION_INDEX)?;
///         for &i in new_indices {
///             section[i] = self.0;
///         }
///         Ok(())
///     }
///
///     fn clone_initializer(&self) -> Box<dyn Initializer> {
///         Box::new(self.clone())
///     }
/// }
///
/// let init = FixedTexture(3);
/// assert!(init.writes().contains(&TEXTURE_SECTION_INDEX.key()));
/// ```
pub trait Initializer: Behavior {
    /// Properties this initializer writes.
    ///
    /// Called once at emitter construction, not per tick.
    fn writes(&self) -> PropertySet;

    /// Write initial values for the particles at `new_indices`.
    ///
    /// `particles` is write-only: its readable set is empty.
    fn initialize(
        &mut self,
        emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError>;

    /// Independent copy with the same configuration and fresh runtime state.
    fn clone_initializer(&self) -> Box<dyn Initializer>;
}

/// Advances existing particles each tick.
///
/// Modifiers see every slot in the reservation, dead or alive. Those that
/// must skip dead particles read `IsAlive` themselves.
pub trait Modifier: Behavior {
    /// Properties this modifier reads.
    ///
    /// Called once at emitter construction, not per tick.
    fn reads(&self) -> PropertySet;

    /// Properties this modifier writes.
    ///
    /// Called once at emitter construction, not per tick.
    fn writes(&self) -> PropertySet;

    /// Advance the particles by `dt` seconds.
    fn update(
        &mut self,
        emitter: &EmitterState,
        particles: &Collection<'_>,
        dt: f32,
    ) -> Result<(), BehaviorError>;

    /// Independent copy with the same configuration and fresh runtime state.
    fn clone_modifier(&self) -> Box<dyn Modifier>;
}

impl Clone for Box<dyn Trigger> {
    fn clone(&self) -> Self {
        self.clone_trigger()
    }
}

impl Clone for Box<dyn Initializer> {
    fn clone(&self) -> Self {
        self.clone_initializer()
    }
}

impl Clone for Box<dyn Modifier> {
    fn clone(&self) -> Self {
        self.clone_modifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counting {
        interval: u32,
        ticks: u32,
    }

    impl Behavior for Counting {
        fn name(&self) -> &str {
            "counting"
        }
    }

    impl Trigger for Counting {
        fn min_particles(&self) -> u32 {
            1
        }
        fn max_particles(&self) -> u32 {
            1
        }
        fn determine_count(&mut self, _emitter: &mut EmitterState, _dt: f32) -> u32 {
            self.ticks += 1;
            if self.ticks >= self.interval {
                self.ticks = 0;
                1
            } else {
                0
            }
        }
        fn clone_trigger(&self) -> Box<dyn Trigger> {
            Box::new(Counting {
                interval: self.interval,
                ticks: 0,
            })
        }
    }

    #[test]
    fn boxed_clone_resets_runtime_state() {
        let mut state = EmitterState::new(1.0);
        let mut original: Box<dyn Trigger> = Box::new(Counting {
            interval: 3,
            ticks: 0,
        });
        original.determine_count(&mut state, 0.1);
        original.determine_count(&mut state, 0.1);

        let mut copy = original.clone();
        assert_eq!(copy.determine_count(&mut state, 0.1), 0);
        assert_eq!(original.determine_count(&mut state, 0.1), 1);
    }

    #[test]
    fn trait_objects_downcast_to_concrete_type() {
        let trigger: Box<dyn Trigger> = Box::new(Counting {
            interval: 7,
            ticks: 0,
        });
        let any: &dyn Any = &*trigger;
        let concrete = any.downcast_ref::<Counting>().unwrap();
        assert_eq!(concrete.interval, 7);
        assert_eq!(trigger.name(), "counting");
    }
}
