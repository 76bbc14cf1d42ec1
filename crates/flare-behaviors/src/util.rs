//! Shared helpers: seeded sampling and builder validation.

use flare_behavior::BehaviorError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A ChaCha8 generator that remembers its seed so clones can restart it.
#[derive(Debug)]
pub(crate) struct SeededRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator restarted from the original seed.
    pub(crate) fn restarted(&self) -> Self {
        Self::new(self.seed)
    }

    /// Uniform in `[min, max]`.
    pub(crate) fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    /// Uniform in `[min, max]`.
    pub(crate) fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    /// Uniform in `[min, max]`.
    pub(crate) fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            min
        } else {
            self.rng.gen_range(min..=max)
        }
    }
}

pub(crate) fn invalid(reason: String) -> BehaviorError {
    BehaviorError::InvalidConfig { reason }
}

/// `value` must be finite.
pub(crate) fn check_finite(what: &str, value: f32) -> Result<(), BehaviorError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{what} must be finite, got {value}")))
    }
}

/// Both bounds finite and `min <= max`.
pub(crate) fn check_range(what: &str, min: f32, max: f32) -> Result<(), BehaviorError> {
    check_finite(what, min)?;
    check_finite(what, max)?;
    if min > max {
        return Err(invalid(format!("{what} range is inverted: {min} > {max}")));
    }
    Ok(())
}

/// Fraction of the particle lifetime elapsed, in `[0, 1]`.
pub(crate) fn life_fraction(time_alive: f32, max_lifetime: f32) -> f32 {
    if max_lifetime > 0.0 {
        (time_alive / max_lifetime).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

pub(crate) fn lerp(initial: f32, ending: f32, t: f32) -> f32 {
    initial + t * (ending - initial)
}
