//! Spawn-position initializers.

use flare_behavior::{Behavior, BehaviorError, Collection, EmitterState, Initializer};
use flare_core::standard::{POSITION_X, POSITION_Y};
use flare_core::PropertySet;

use crate::util::{check_range, SeededRng};

/// Places each particle uniformly inside an axis-aligned rectangle
/// relative to the emitter origin.
///
/// The emitter adds its world position afterwards.
#[derive(Debug)]
pub struct RandomRegionPositionInitializer {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
    rng: SeededRng,
}

impl RandomRegionPositionInitializer {
    /// Region `[min_x, max_x] × [min_y, max_y]`.
    pub fn new(
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
        seed: u64,
    ) -> Result<Self, BehaviorError> {
        check_range("x", min_x, max_x)?;
        check_range("y", min_y, max_y)?;
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            rng: SeededRng::new(seed),
        })
    }

    /// Every particle at the emitter origin.
    pub fn point() -> Self {
        Self {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
            rng: SeededRng::new(0),
        }
    }
}

impl Behavior for RandomRegionPositionInitializer {
    fn name(&self) -> &str {
        "RandomRegionPositionInitializer"
    }
}

impl Initializer for RandomRegionPositionInitializer {
    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(POSITION_X).with(POSITION_Y)
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let mut xs = particles.values(&POSITION_X)?;
        let mut ys = particles.values(&POSITION_Y)?;
        for &i in new_indices {
            xs[i] = self.rng.range_f32(self.min_x, self.max_x);
            ys[i] = self.rng.range_f32(self.min_y, self.max_y);
        }
        Ok(())
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(Self {
            min_x: self.min_x,
            max_x: self.max_x,
            min_y: self.min_y,
            max_y: self.max_y,
            rng: self.rng.restarted(),
        })
    }
}
