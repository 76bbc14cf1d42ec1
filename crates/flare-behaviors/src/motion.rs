//! Velocity initialization and integration.

use std::f32::consts::TAU;

use flare_behavior::{Behavior, BehaviorError, Collection, EmitterState, Initializer, Modifier};
use flare_core::standard::{IS_ALIVE, POSITION_X, POSITION_Y, VELOCITY_X, VELOCITY_Y};
use flare_core::PropertySet;

use crate::util::{check_finite, check_range, invalid, SeededRng};

// ── RandomDirectionVelocityInitializer ─────────────────────────────

/// Gives each particle a velocity with a random heading and speed.
///
/// Constructed via [`RandomDirectionVelocityInitializer::builder`].
#[derive(Debug)]
pub struct RandomDirectionVelocityInitializer {
    min_angle: f32,
    max_angle: f32,
    min_speed: f32,
    max_speed: f32,
    rng: SeededRng,
}

/// Builder for [`RandomDirectionVelocityInitializer`].
///
/// Required field: `speed`.
#[derive(Clone, Debug)]
pub struct RandomDirectionVelocityInitializerBuilder {
    min_angle: f32,
    max_angle: f32,
    speed: Option<(f32, f32)>,
    seed: u64,
}

impl RandomDirectionVelocityInitializer {
    /// Create a builder. Headings default to the full circle.
    pub fn builder() -> RandomDirectionVelocityInitializerBuilder {
        RandomDirectionVelocityInitializerBuilder {
            min_angle: 0.0,
            max_angle: TAU,
            speed: None,
            seed: 0,
        }
    }
}

impl RandomDirectionVelocityInitializerBuilder {
    /// Heading range in radians, counter-clockwise from +X.
    pub fn angle(mut self, min: f32, max: f32) -> Self {
        self.min_angle = min;
        self.max_angle = max;
        self
    }

    /// Speed range in units per second. Must be non-negative.
    pub fn speed(mut self, min: f32, max: f32) -> Self {
        self.speed = Some((min, max));
        self
    }

    /// RNG seed (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the initializer, validating all configuration.
    pub fn build(self) -> Result<RandomDirectionVelocityInitializer, BehaviorError> {
        let (min_speed, max_speed) = self
            .speed
            .ok_or_else(|| invalid("speed is required".to_string()))?;
        check_range("speed", min_speed, max_speed)?;
        if min_speed < 0.0 {
            return Err(invalid(format!("speed must be >= 0, got {min_speed}")));
        }
        check_range("angle", self.min_angle, self.max_angle)?;
        Ok(RandomDirectionVelocityInitializer {
            min_angle: self.min_angle,
            max_angle: self.max_angle,
            min_speed,
            max_speed,
            rng: SeededRng::new(self.seed),
        })
    }
}

impl Behavior for RandomDirectionVelocityInitializer {
    fn name(&self) -> &str {
        "RandomDirectionVelocityInitializer"
    }
}

impl Initializer for RandomDirectionVelocityInitializer {
    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(VELOCITY_X).with(VELOCITY_Y)
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let mut vx = particles.values(&VELOCITY_X)?;
        let mut vy = particles.values(&VELOCITY_Y)?;
        for &i in new_indices {
            let angle = self.rng.range_f32(self.min_angle, self.max_angle);
            let speed = self.rng.range_f32(self.min_speed, self.max_speed);
            let (sin, cos) = angle.sin_cos();
            vx[i] = cos * speed;
            vy[i] = sin * speed;
        }
        Ok(())
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(Self {
            min_angle: self.min_angle,
            max_angle: self.max_angle,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            rng: self.rng.restarted(),
        })
    }
}

// ── ApplyVelocityModifier ──────────────────────────────────────────

/// Integrates `position += velocity × dt` for alive particles.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApplyVelocityModifier;

impl ApplyVelocityModifier {
    /// Create the modifier.
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for ApplyVelocityModifier {
    fn name(&self) -> &str {
        "ApplyVelocityModifier"
    }
}

impl Modifier for ApplyVelocityModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty()
            .with(IS_ALIVE)
            .with(VELOCITY_X)
            .with(VELOCITY_Y)
    }

    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(POSITION_X).with(POSITION_Y)
    }

    fn update(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        dt: f32,
    ) -> Result<(), BehaviorError> {
        let alive = particles.read_only_values(&IS_ALIVE)?;
        let vx = particles.read_only_values(&VELOCITY_X)?;
        let vy = particles.read_only_values(&VELOCITY_Y)?;
        let mut px = particles.values(&POSITION_X)?;
        let mut py = particles.values(&POSITION_Y)?;
        for i in 0..particles.count() {
            if alive[i] {
                px[i] += vx[i] * dt;
                py[i] += vy[i] * dt;
            }
        }
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(*self)
    }
}

// ── ConstantAccelerationModifier ───────────────────────────────────

/// Adds a constant acceleration (e.g. gravity) to alive particles.
#[derive(Clone, Copy, Debug)]
pub struct ConstantAccelerationModifier {
    x: f32,
    y: f32,
}

impl ConstantAccelerationModifier {
    /// Acceleration in units per second squared.
    pub fn new(x: f32, y: f32) -> Result<Self, BehaviorError> {
        check_finite("acceleration x", x)?;
        check_finite("acceleration y", y)?;
        Ok(Self { x, y })
    }
}

impl Behavior for ConstantAccelerationModifier {
    fn name(&self) -> &str {
        "ConstantAccelerationModifier"
    }
}

impl Modifier for ConstantAccelerationModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty().with(IS_ALIVE)
    }

    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(VELOCITY_X).with(VELOCITY_Y)
    }

    fn update(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        dt: f32,
    ) -> Result<(), BehaviorError> {
        let alive = particles.read_only_values(&IS_ALIVE)?;
        let mut vx = particles.values(&VELOCITY_X)?;
        let mut vy = particles.values(&VELOCITY_Y)?;
        for i in 0..particles.count() {
            if alive[i] {
                vx[i] += self.x * dt;
                vy[i] += self.y * dt;
            }
        }
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(*self)
    }
}
