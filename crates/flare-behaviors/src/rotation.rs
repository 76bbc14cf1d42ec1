//! Rotation initialization and integration.

use flare_behavior::{Behavior, BehaviorError, Collection, EmitterState, Initializer, Modifier};
use flare_core::standard::{IS_ALIVE, ROTATIONAL_VELOCITY_IN_RADIANS, ROTATION_IN_RADIANS};
use flare_core::PropertySet;

use crate::util::{check_range, SeededRng};

/// Draws a starting rotation and an angular velocity per particle.
#[derive(Debug)]
pub struct RandomRotationInitializer {
    min_rotation: f32,
    max_rotation: f32,
    min_velocity: f32,
    max_velocity: f32,
    rng: SeededRng,
}

impl RandomRotationInitializer {
    /// Rotation in `[min_rotation, max_rotation]` radians, angular velocity
    /// in `[min_velocity, max_velocity]` radians per second.
    pub fn new(
        min_rotation: f32,
        max_rotation: f32,
        min_velocity: f32,
        max_velocity: f32,
        seed: u64,
    ) -> Result<Self, BehaviorError> {
        check_range("rotation", min_rotation, max_rotation)?;
        check_range("rotational velocity", min_velocity, max_velocity)?;
        Ok(Self {
            min_rotation,
            max_rotation,
            min_velocity,
            max_velocity,
            rng: SeededRng::new(seed),
        })
    }
}

impl Behavior for RandomRotationInitializer {
    fn name(&self) -> &str {
        "RandomRotationInitializer"
    }
}

impl Initializer for RandomRotationInitializer {
    fn writes(&self) -> PropertySet {
        PropertySet::empty()
            .with(ROTATION_IN_RADIANS)
            .with(ROTATIONAL_VELOCITY_IN_RADIANS)
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let mut rotation = particles.values(&ROTATION_IN_RADIANS)?;
        let mut velocity = particles.values(&ROTATIONAL_VELOCITY_IN_RADIANS)?;
        for &i in new_indices {
            rotation[i] = self.rng.range_f32(self.min_rotation, self.max_rotation);
            velocity[i] = self.rng.range_f32(self.min_velocity, self.max_velocity);
        }
        Ok(())
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(Self {
            min_rotation: self.min_rotation,
            max_rotation: self.max_rotation,
            min_velocity: self.min_velocity,
            max_velocity: self.max_velocity,
            rng: self.rng.restarted(),
        })
    }
}

/// Integrates `rotation += angular velocity × dt` for alive particles.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApplyRotationalVelocityModifier;

impl ApplyRotationalVelocityModifier {
    /// Create the modifier.
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for ApplyRotationalVelocityModifier {
    fn name(&self) -> &str {
        "ApplyRotationalVelocityModifier"
    }
}

impl Modifier for ApplyRotationalVelocityModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty()
            .with(IS_ALIVE)
            .with(ROTATIONAL_VELOCITY_IN_RADIANS)
    }

    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(ROTATION_IN_RADIANS)
    }

    fn update(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        dt: f32,
    ) -> Result<(), BehaviorError> {
        let alive = particles.read_only_values(&IS_ALIVE)?;
        let velocity = particles.read_only_values(&ROTATIONAL_VELOCITY_IN_RADIANS)?;
        let mut rotation = particles.values(&ROTATION_IN_RADIANS)?;
        for i in 0..particles.count() {
            if alive[i] {
                rotation[i] += velocity[i] * dt;
            }
        }
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(*self)
    }
}
