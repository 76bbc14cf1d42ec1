//! Emitter-level state visible to behaviors.

use flare_core::Vec2;

/// The parts of an emitter that behaviors may observe.
///
/// Triggers receive it mutably so a one-shot trigger can switch emission
/// off; initializers and modifiers only read it.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterState {
    world_position: Vec2,
    max_particle_lifetime: f32,
    emitting: bool,
}

impl EmitterState {
    /// State at the origin with emission enabled.
    pub fn new(max_particle_lifetime: f32) -> Self {
        Self {
            world_position: Vec2::ZERO,
            max_particle_lifetime,
            emitting: true,
        }
    }

    /// World-space origin of the emitter.
    pub fn world_position(&self) -> Vec2 {
        self.world_position
    }

    /// Move the emitter. Already-emitted particles are not translated.
    pub fn set_world_position(&mut self, position: Vec2) {
        self.world_position = position;
    }

    /// Seconds a particle lives before it is marked dead.
    pub fn max_particle_lifetime(&self) -> f32 {
        self.max_particle_lifetime
    }

    /// Whether the emit stage runs.
    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Enable or disable the emit stage.
    pub fn set_emitting(&mut self, emitting: bool) {
        self.emitting = emitting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_emitting_at_origin() {
        let state = EmitterState::new(5.0);
        assert!(state.is_emitting());
        assert_eq!(state.world_position(), Vec2::ZERO);
        assert_eq!(state.max_particle_lifetime(), 5.0);
    }
}
