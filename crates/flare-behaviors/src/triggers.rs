//! Standard triggers.
//!
//! Every trigger draws its emission count uniformly from the inclusive
//! `[min_particles, max_particles]` range when it fires.

use flare_behavior::{Behavior, BehaviorError, EmitterState, Trigger};
use flare_core::Vec2;

use crate::util::{check_finite, invalid, SeededRng};

fn check_counts(min: u32, max: u32) -> Result<(), BehaviorError> {
    if min > max {
        return Err(invalid(format!(
            "particle count range is inverted: {min} > {max}"
        )));
    }
    Ok(())
}

// ── TimeElapsedTrigger ─────────────────────────────────────────────

/// Fires every `interval` seconds of accumulated tick time.
///
/// Constructed via [`TimeElapsedTrigger::builder`].
#[derive(Debug)]
pub struct TimeElapsedTrigger {
    interval: f32,
    min_particles: u32,
    max_particles: u32,
    rng: SeededRng,
    elapsed: f32,
}

/// Builder for [`TimeElapsedTrigger`].
///
/// Required field: `interval`.
#[derive(Clone, Debug)]
pub struct TimeElapsedTriggerBuilder {
    interval: Option<f32>,
    min_particles: u32,
    max_particles: u32,
    seed: u64,
}

impl TimeElapsedTrigger {
    /// Create a builder. Defaults to one particle per firing.
    pub fn builder() -> TimeElapsedTriggerBuilder {
        TimeElapsedTriggerBuilder {
            interval: None,
            min_particles: 1,
            max_particles: 1,
            seed: 0,
        }
    }

    /// Seconds between firings.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Time accumulated since the last firing.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl TimeElapsedTriggerBuilder {
    /// Seconds between firings. Must be finite and positive.
    pub fn interval(mut self, seconds: f32) -> Self {
        self.interval = Some(seconds);
        self
    }

    /// Inclusive particle count range per firing.
    pub fn particles(mut self, min: u32, max: u32) -> Self {
        self.min_particles = min;
        self.max_particles = max;
        self
    }

    /// RNG seed for the count draw (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the trigger, validating all configuration.
    pub fn build(self) -> Result<TimeElapsedTrigger, BehaviorError> {
        let interval = self
            .interval
            .ok_or_else(|| invalid("interval is required".to_string()))?;
        check_finite("interval", interval)?;
        if interval <= 0.0 {
            return Err(invalid(format!("interval must be positive, got {interval}")));
        }
        check_counts(self.min_particles, self.max_particles)?;
        Ok(TimeElapsedTrigger {
            interval,
            min_particles: self.min_particles,
            max_particles: self.max_particles,
            rng: SeededRng::new(self.seed),
            elapsed: 0.0,
        })
    }
}

impl Behavior for TimeElapsedTrigger {
    fn name(&self) -> &str {
        "TimeElapsedTrigger"
    }
}

impl Trigger for TimeElapsedTrigger {
    fn min_particles(&self) -> u32 {
        self.min_particles
    }

    fn max_particles(&self) -> u32 {
        self.max_particles
    }

    fn determine_count(&mut self, _emitter: &mut EmitterState, dt: f32) -> u32 {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return 0;
        }
        self.elapsed = 0.0;
        self.rng.range_u32(self.min_particles, self.max_particles)
    }

    fn clone_trigger(&self) -> Box<dyn Trigger> {
        Box::new(Self {
            interval: self.interval,
            min_particles: self.min_particles,
            max_particles: self.max_particles,
            rng: self.rng.restarted(),
            elapsed: 0.0,
        })
    }
}

// ── OneShotTrigger ─────────────────────────────────────────────────

/// Fires on the first tick it is asked, then switches emission off.
///
/// Re-enabling emission on the emitter fires it again.
#[derive(Debug)]
pub struct OneShotTrigger {
    min_particles: u32,
    max_particles: u32,
    rng: SeededRng,
}

impl OneShotTrigger {
    /// A burst of exactly `count` particles.
    pub fn new(count: u32) -> Self {
        Self {
            min_particles: count,
            max_particles: count,
            rng: SeededRng::new(0),
        }
    }

    /// A burst drawn from `[min, max]`.
    pub fn with_range(min: u32, max: u32, seed: u64) -> Result<Self, BehaviorError> {
        check_counts(min, max)?;
        Ok(Self {
            min_particles: min,
            max_particles: max,
            rng: SeededRng::new(seed),
        })
    }
}

impl Behavior for OneShotTrigger {
    fn name(&self) -> &str {
        "OneShotTrigger"
    }
}

impl Trigger for OneShotTrigger {
    fn min_particles(&self) -> u32 {
        self.min_particles
    }

    fn max_particles(&self) -> u32 {
        self.max_particles
    }

    fn determine_count(&mut self, emitter: &mut EmitterState, _dt: f32) -> u32 {
        emitter.set_emitting(false);
        self.rng.range_u32(self.min_particles, self.max_particles)
    }

    fn clone_trigger(&self) -> Box<dyn Trigger> {
        Box::new(Self {
            min_particles: self.min_particles,
            max_particles: self.max_particles,
            rng: self.rng.restarted(),
        })
    }
}

// ── DistanceTravelledTrigger ───────────────────────────────────────

/// Fires each time the emitter's world position has moved `distance`
/// units since the last firing.
///
/// Movement is sampled once per tick, so a path is measured as the sum of
/// straight segments between tick positions.
#[derive(Debug)]
pub struct DistanceTravelledTrigger {
    distance: f32,
    min_particles: u32,
    max_particles: u32,
    rng: SeededRng,
    last_position: Option<Vec2>,
    travelled: f32,
}

impl DistanceTravelledTrigger {
    /// Fire every `distance` units, emitting `[min, max]` particles.
    pub fn new(distance: f32, min: u32, max: u32, seed: u64) -> Result<Self, BehaviorError> {
        check_finite("distance", distance)?;
        if distance <= 0.0 {
            return Err(invalid(format!("distance must be positive, got {distance}")));
        }
        check_counts(min, max)?;
        Ok(Self {
            distance,
            min_particles: min,
            max_particles: max,
            rng: SeededRng::new(seed),
            last_position: None,
            travelled: 0.0,
        })
    }

    /// Distance accumulated since the last firing.
    pub fn travelled(&self) -> f32 {
        self.travelled
    }
}

impl Behavior for DistanceTravelledTrigger {
    fn name(&self) -> &str {
        "DistanceTravelledTrigger"
    }
}

impl Trigger for DistanceTravelledTrigger {
    fn min_particles(&self) -> u32 {
        self.min_particles
    }

    fn max_particles(&self) -> u32 {
        self.max_particles
    }

    fn determine_count(&mut self, emitter: &mut EmitterState, _dt: f32) -> u32 {
        let position = emitter.world_position();
        if let Some(last) = self.last_position {
            self.travelled += position.distance(last);
        }
        self.last_position = Some(position);
        if self.travelled < self.distance {
            return 0;
        }
        self.travelled = 0.0;
        self.rng.range_u32(self.min_particles, self.max_particles)
    }

    fn clone_trigger(&self) -> Box<dyn Trigger> {
        Box::new(Self {
            distance: self.distance,
            min_particles: self.min_particles,
            max_particles: self.max_particles,
            rng: self.rng.restarted(),
            last_position: None,
            travelled: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Builder tests
    // ---------------------------------------------------------------

    #[test]
    fn time_elapsed_requires_interval() {
        let err = TimeElapsedTrigger::builder().build().unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn time_elapsed_rejects_non_positive_interval() {
        assert!(TimeElapsedTrigger::builder().interval(0.0).build().is_err());
        assert!(TimeElapsedTrigger::builder().interval(-1.0).build().is_err());
        assert!(TimeElapsedTrigger::builder()
            .interval(f32::INFINITY)
            .build()
            .is_err());
    }

    #[test]
    fn inverted_count_range_is_rejected() {
        let result = TimeElapsedTrigger::builder()
            .interval(1.0)
            .particles(5, 2)
            .build();
        assert!(result.is_err());
        assert!(OneShotTrigger::with_range(3, 1, 0).is_err());
        assert!(DistanceTravelledTrigger::new(1.0, 3, 1, 0).is_err());
    }

    #[test]
    fn distance_must_be_positive() {
        assert!(DistanceTravelledTrigger::new(0.0, 1, 1, 0).is_err());
    }

    // ---------------------------------------------------------------
    // Firing tests
    // ---------------------------------------------------------------

    #[test]
    fn time_elapsed_fires_on_interval_and_resets() {
        let mut trigger = TimeElapsedTrigger::builder()
            .interval(0.5)
            .particles(3, 3)
            .build()
            .unwrap();
        let mut state = EmitterState::new(1.0);

        assert_eq!(trigger.determine_count(&mut state, 0.25), 0);
        assert_eq!(trigger.determine_count(&mut state, 0.25), 3);
        assert_eq!(trigger.elapsed(), 0.0);
        assert_eq!(trigger.determine_count(&mut state, 0.25), 0);
        assert!(state.is_emitting());
    }

    #[test]
    fn counts_stay_within_inclusive_range() {
        let mut trigger = TimeElapsedTrigger::builder()
            .interval(0.1)
            .particles(2, 6)
            .seed(17)
            .build()
            .unwrap();
        let mut state = EmitterState::new(1.0);
        for _ in 0..200 {
            let n = trigger.determine_count(&mut state, 0.1);
            assert!((2..=6).contains(&n), "count {n} outside [2, 6]");
        }
    }

    #[test]
    fn one_shot_turns_emission_off() {
        let mut trigger = OneShotTrigger::new(12);
        let mut state = EmitterState::new(1.0);
        assert_eq!(trigger.determine_count(&mut state, 0.016), 12);
        assert!(!state.is_emitting());
    }

    #[test]
    fn distance_accumulates_movement() {
        let mut trigger = DistanceTravelledTrigger::new(10.0, 1, 1, 0).unwrap();
        let mut state = EmitterState::new(1.0);

        assert_eq!(trigger.determine_count(&mut state, 0.1), 0);
        state.set_world_position(Vec2::new(6.0, 0.0));
        assert_eq!(trigger.determine_count(&mut state, 0.1), 0);
        assert_eq!(trigger.travelled(), 6.0);
        state.set_world_position(Vec2::new(6.0, 4.0));
        assert_eq!(trigger.determine_count(&mut state, 0.1), 1);
        assert_eq!(trigger.travelled(), 0.0);
    }

    #[test]
    fn stationary_emitter_never_fires_distance_trigger() {
        let mut trigger = DistanceTravelledTrigger::new(1.0, 1, 1, 0).unwrap();
        let mut state = EmitterState::new(1.0);
        state.set_world_position(Vec2::new(100.0, 100.0));
        for _ in 0..10 {
            assert_eq!(trigger.determine_count(&mut state, 0.1), 0);
        }
    }

    // ---------------------------------------------------------------
    // Clone tests
    // ---------------------------------------------------------------

    #[test]
    fn clone_resets_accumulator_but_keeps_config() {
        let mut trigger = TimeElapsedTrigger::builder()
            .interval(1.0)
            .particles(4, 4)
            .build()
            .unwrap();
        let mut state = EmitterState::new(1.0);
        trigger.determine_count(&mut state, 0.9);

        let mut copy = trigger.clone_trigger();
        assert_eq!(copy.min_particles(), 4);
        assert_eq!(copy.determine_count(&mut state, 0.2), 0);
        assert_eq!(trigger.determine_count(&mut state, 0.2), 4);
    }

    #[test]
    fn clone_replays_random_sequence() {
        let template = TimeElapsedTrigger::builder()
            .interval(0.1)
            .particles(0, 100)
            .seed(5)
            .build()
            .unwrap();
        let mut state = EmitterState::new(1.0);
        let mut a = template.clone_trigger();
        let mut b = template.clone_trigger();
        let xs: Vec<u32> = (0..8).map(|_| a.determine_count(&mut state, 0.1)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.determine_count(&mut state, 0.1)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn distance_clone_forgets_last_position() {
        let mut trigger = DistanceTravelledTrigger::new(5.0, 1, 1, 0).unwrap();
        let mut state = EmitterState::new(1.0);
        trigger.determine_count(&mut state, 0.1);
        state.set_world_position(Vec2::new(4.0, 0.0));
        trigger.determine_count(&mut state, 0.1);

        let mut copy = trigger.clone_trigger();
        state.set_world_position(Vec2::new(8.0, 0.0));
        assert_eq!(copy.determine_count(&mut state, 0.1), 0);
        assert_eq!(trigger.determine_count(&mut state, 0.1), 1);
    }
}
