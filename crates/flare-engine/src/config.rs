//! Emitter configuration and validation.
//!
//! [`EmitterConfig`] is the authored template for an emitter. Cloning it
//! deep-copies every behavior through its `clone_*` method, so one
//! template can be instantiated into many independent emitters.

use flare_behavior::{Initializer, Modifier, Trigger};

use crate::error::EmitterError;

/// Complete configuration for constructing an [`Emitter`](crate::Emitter).
#[derive(Clone, Debug)]
pub struct EmitterConfig {
    /// Decides how many particles to emit each tick. Required.
    pub trigger: Option<Box<dyn Trigger>>,
    /// Run in order on newly claimed particles.
    pub initializers: Vec<Box<dyn Initializer>>,
    /// Run in order over the whole reservation each tick.
    pub modifiers: Vec<Box<dyn Modifier>>,
    /// Seconds a particle lives. Must be finite and positive.
    pub max_particle_lifetime: f32,
    /// Slots reserved at construction. Default: 50. Minimum: 1.
    pub initial_capacity: usize,
    /// Fraction of the current reservation added when emission runs out
    /// of dead slots. Default: 0.5.
    pub reservation_growth: f32,
}

impl EmitterConfig {
    /// Default slots reserved at construction.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 50;
    /// Default reservation growth fraction.
    pub const DEFAULT_RESERVATION_GROWTH: f32 = 0.5;

    /// A config with `trigger` and default settings.
    pub fn new(trigger: impl Trigger) -> Self {
        Self {
            trigger: Some(Box::new(trigger)),
            ..Self::default()
        }
    }

    /// Append an initializer.
    pub fn initializer(mut self, initializer: impl Initializer) -> Self {
        self.initializers.push(Box::new(initializer));
        self
    }

    /// Append a modifier.
    pub fn modifier(mut self, modifier: impl Modifier) -> Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    /// Set the particle lifetime in seconds.
    pub fn max_particle_lifetime(mut self, seconds: f32) -> Self {
        self.max_particle_lifetime = seconds;
        self
    }

    /// Set the slots reserved at construction.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), EmitterError> {
        if self.trigger.is_none() {
            return Err(config_error("trigger is required".to_string()));
        }
        let lifetime = self.max_particle_lifetime;
        if !lifetime.is_finite() || lifetime <= 0.0 {
            return Err(config_error(format!(
                "max_particle_lifetime must be finite and positive, got {lifetime}"
            )));
        }
        if self.initial_capacity == 0 {
            return Err(config_error("initial_capacity must be at least 1".to_string()));
        }
        let growth = self.reservation_growth;
        if !growth.is_finite() || growth <= 0.0 {
            return Err(config_error(format!(
                "reservation_growth must be finite and positive, got {growth}"
            )));
        }
        Ok(())
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            trigger: None,
            initializers: Vec::new(),
            modifiers: Vec::new(),
            max_particle_lifetime: 1.0,
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            reservation_growth: Self::DEFAULT_RESERVATION_GROWTH,
        }
    }
}

fn config_error(reason: String) -> EmitterError {
    EmitterError::Configuration { reason }
}
