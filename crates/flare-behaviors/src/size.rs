//! Particle size: start/end initialization and lifetime interpolation.
//!
//! Initializers write the initial, ending and current size. The current
//! size starts equal to the initial size, so a particle renders correctly
//! before any modifier runs.

use flare_behavior::{Behavior, BehaviorError, Collection, EmitterState, Initializer, Modifier};
use flare_core::standard::{
    CURRENT_HEIGHT, CURRENT_WIDTH, ENDING_HEIGHT, ENDING_WIDTH, INITIAL_HEIGHT, INITIAL_WIDTH,
    IS_ALIVE, TIME_ALIVE,
};
use flare_core::PropertySet;

use crate::util::{check_finite, check_range, lerp, life_fraction, SeededRng};

/// Width and height in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Construct from components.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn validate(self, what: &str) -> Result<(), BehaviorError> {
        check_finite(what, self.width)?;
        check_finite(what, self.height)
    }
}

fn size_writes() -> PropertySet {
    PropertySet::empty()
        .with(INITIAL_WIDTH)
        .with(INITIAL_HEIGHT)
        .with(ENDING_WIDTH)
        .with(ENDING_HEIGHT)
        .with(CURRENT_WIDTH)
        .with(CURRENT_HEIGHT)
}

/// Writes one particle's sizes.
fn write_sizes(
    particles: &Collection<'_>,
    new_indices: &[usize],
    mut sizes: impl FnMut() -> (Size, Size),
) -> Result<(), BehaviorError> {
    let mut initial_w = particles.values(&INITIAL_WIDTH)?;
    let mut initial_h = particles.values(&INITIAL_HEIGHT)?;
    let mut ending_w = particles.values(&ENDING_WIDTH)?;
    let mut ending_h = particles.values(&ENDING_HEIGHT)?;
    let mut current_w = particles.values(&CURRENT_WIDTH)?;
    let mut current_h = particles.values(&CURRENT_HEIGHT)?;
    for &i in new_indices {
        let (initial, ending) = sizes();
        initial_w[i] = initial.width;
        initial_h[i] = initial.height;
        ending_w[i] = ending.width;
        ending_h[i] = ending.height;
        current_w[i] = initial.width;
        current_h[i] = initial.height;
    }
    Ok(())
}

// ── StaticSizeInitializer ──────────────────────────────────────────

/// Gives every particle the same initial and ending size.
#[derive(Clone, Copy, Debug)]
pub struct StaticSizeInitializer {
    initial: Size,
    ending: Size,
}

impl StaticSizeInitializer {
    /// Grow (or shrink) from `initial` to `ending` over the lifetime.
    pub fn new(initial: Size, ending: Size) -> Result<Self, BehaviorError> {
        initial.validate("initial size")?;
        ending.validate("ending size")?;
        Ok(Self { initial, ending })
    }

    /// Constant size for the whole lifetime.
    pub fn constant(size: Size) -> Result<Self, BehaviorError> {
        Self::new(size, size)
    }
}

impl Behavior for StaticSizeInitializer {
    fn name(&self) -> &str {
        "StaticSizeInitializer"
    }
}

impl Initializer for StaticSizeInitializer {
    fn writes(&self) -> PropertySet {
        size_writes()
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        write_sizes(particles, new_indices, || (self.initial, self.ending))
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(*self)
    }
}

// ── RandomSizeInitializer ──────────────────────────────────────────

/// Draws initial and ending sizes per particle, each dimension uniform
/// within its range.
#[derive(Debug)]
pub struct RandomSizeInitializer {
    initial_min: Size,
    initial_max: Size,
    ending_min: Size,
    ending_max: Size,
    rng: SeededRng,
}

impl RandomSizeInitializer {
    /// Initial size in `[initial_min, initial_max]`, ending size in
    /// `[ending_min, ending_max]`, per dimension.
    pub fn new(
        initial_min: Size,
        initial_max: Size,
        ending_min: Size,
        ending_max: Size,
        seed: u64,
    ) -> Result<Self, BehaviorError> {
        check_range("initial width", initial_min.width, initial_max.width)?;
        check_range("initial height", initial_min.height, initial_max.height)?;
        check_range("ending width", ending_min.width, ending_max.width)?;
        check_range("ending height", ending_min.height, ending_max.height)?;
        Ok(Self {
            initial_min,
            initial_max,
            ending_min,
            ending_max,
            rng: SeededRng::new(seed),
        })
    }

    fn sample(rng: &mut SeededRng, min: Size, max: Size) -> Size {
        Size::new(
            rng.range_f32(min.width, max.width),
            rng.range_f32(min.height, max.height),
        )
    }
}

impl Behavior for RandomSizeInitializer {
    fn name(&self) -> &str {
        "RandomSizeInitializer"
    }
}

impl Initializer for RandomSizeInitializer {
    fn writes(&self) -> PropertySet {
        size_writes()
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let rng = &mut self.rng;
        let (initial_min, initial_max) = (self.initial_min, self.initial_max);
        let (ending_min, ending_max) = (self.ending_min, self.ending_max);
        write_sizes(particles, new_indices, || {
            let initial = Self::sample(rng, initial_min, initial_max);
            let ending = Self::sample(rng, ending_min, ending_max);
            (initial, ending)
        })
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(Self {
            initial_min: self.initial_min,
            initial_max: self.initial_max,
            ending_min: self.ending_min,
            ending_max: self.ending_max,
            rng: self.rng.restarted(),
        })
    }
}

// ── LinearSizeInterpolationModifier ────────────────────────────────

/// Moves the current size linearly from initial to ending over the
/// particle's lifetime:
/// `current = initial + (TimeAlive / MaxLifetime) × (ending − initial)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearSizeInterpolationModifier;

impl LinearSizeInterpolationModifier {
    /// Create the modifier.
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for LinearSizeInterpolationModifier {
    fn name(&self) -> &str {
        "LinearSizeInterpolationModifier"
    }
}

impl Modifier for LinearSizeInterpolationModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty()
            .with(IS_ALIVE)
            .with(TIME_ALIVE)
            .with(INITIAL_WIDTH)
            .with(INITIAL_HEIGHT)
            .with(ENDING_WIDTH)
            .with(ENDING_HEIGHT)
    }

    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(CURRENT_WIDTH).with(CURRENT_HEIGHT)
    }

    fn update(
        &mut self,
        emitter: &EmitterState,
        particles: &Collection<'_>,
        _dt: f32,
    ) -> Result<(), BehaviorError> {
        let alive = particles.read_only_values(&IS_ALIVE)?;
        let time_alive = particles.read_only_values(&TIME_ALIVE)?;
        let initial_w = particles.read_only_values(&INITIAL_WIDTH)?;
        let initial_h = particles.read_only_values(&INITIAL_HEIGHT)?;
        let ending_w = particles.read_only_values(&ENDING_WIDTH)?;
        let ending_h = particles.read_only_values(&ENDING_HEIGHT)?;
        let mut current_w = particles.values(&CURRENT_WIDTH)?;
        let mut current_h = particles.values(&CURRENT_HEIGHT)?;
        let lifetime = emitter.max_particle_lifetime();
        for i in 0..particles.count() {
            if !alive[i] {
                continue;
            }
            let t = life_fraction(time_alive[i], lifetime);
            current_w[i] = lerp(initial_w[i], ending_w[i], t);
            current_h[i] = lerp(initial_h[i], ending_h[i], t);
        }
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(*self)
    }
}
