//! Particle color: start/end initialization and lifetime interpolation.

use flare_behavior::{Behavior, BehaviorError, Collection, EmitterState, Initializer, Modifier};
use flare_core::standard::{
    CURRENT_ALPHA, CURRENT_BLUE, CURRENT_GREEN, CURRENT_RED, ENDING_ALPHA, ENDING_BLUE,
    ENDING_GREEN, ENDING_RED, INITIAL_ALPHA, INITIAL_BLUE, INITIAL_GREEN, INITIAL_RED, IS_ALIVE,
    TIME_ALIVE,
};
use flare_core::{Property, PropertySet};

use crate::util::{check_finite, lerp, life_fraction};

/// A color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Construct from channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn channels(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn validate(self, what: &str) -> Result<(), BehaviorError> {
        self.channels()
            .into_iter()
            .try_for_each(|c| check_finite(what, c))
    }
}

const INITIAL: [Property<f32>; 4] = [INITIAL_RED, INITIAL_GREEN, INITIAL_BLUE, INITIAL_ALPHA];
const ENDING: [Property<f32>; 4] = [ENDING_RED, ENDING_GREEN, ENDING_BLUE, ENDING_ALPHA];
const CURRENT: [Property<f32>; 4] = [CURRENT_RED, CURRENT_GREEN, CURRENT_BLUE, CURRENT_ALPHA];

fn set_of(properties: &[Property<f32>]) -> PropertySet {
    properties.iter().map(|p| p.key()).collect()
}

// ── StaticColorInitializer ─────────────────────────────────────────

/// Gives every particle the same initial and ending color. The current
/// color starts at the initial color.
#[derive(Clone, Copy, Debug)]
pub struct StaticColorInitializer {
    initial: Rgba,
    ending: Rgba,
}

impl StaticColorInitializer {
    /// Fade from `initial` to `ending` over the lifetime.
    pub fn new(initial: Rgba, ending: Rgba) -> Result<Self, BehaviorError> {
        initial.validate("initial color")?;
        ending.validate("ending color")?;
        Ok(Self { initial, ending })
    }
}

impl Behavior for StaticColorInitializer {
    fn name(&self) -> &str {
        "StaticColorInitializer"
    }
}

impl Initializer for StaticColorInitializer {
    fn writes(&self) -> PropertySet {
        set_of(&INITIAL)
            .union(&set_of(&ENDING))
            .union(&set_of(&CURRENT))
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let initial = self.initial.channels();
        let ending = self.ending.channels();
        for channel in 0..4 {
            let mut initial_values = particles.values(&INITIAL[channel])?;
            let mut ending_values = particles.values(&ENDING[channel])?;
            let mut current_values = particles.values(&CURRENT[channel])?;
            for &i in new_indices {
                initial_values[i] = initial[channel];
                ending_values[i] = ending[channel];
                current_values[i] = initial[channel];
            }
        }
        Ok(())
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(*self)
    }
}

// ── LinearColorInterpolationModifier ───────────────────────────────

/// Moves each current color channel linearly from initial to ending over
/// the particle's lifetime.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearColorInterpolationModifier;

impl LinearColorInterpolationModifier {
    /// Create the modifier.
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for LinearColorInterpolationModifier {
    fn name(&self) -> &str {
        "LinearColorInterpolationModifier"
    }
}

impl Modifier for LinearColorInterpolationModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty()
            .with(IS_ALIVE)
            .with(TIME_ALIVE)
            .union(&set_of(&INITIAL))
            .union(&set_of(&ENDING))
    }

    fn writes(&self) -> PropertySet {
        set_of(&CURRENT)
    }

    fn update(
        &mut self,
        emitter: &EmitterState,
        particles: &Collection<'_>,
        _dt: f32,
    ) -> Result<(), BehaviorError> {
        let alive = particles.read_only_values(&IS_ALIVE)?;
        let time_alive = particles.read_only_values(&TIME_ALIVE)?;
        let lifetime = emitter.max_particle_lifetime();
        for channel in 0..4 {
            let initial = particles.read_only_values(&INITIAL[channel])?;
            let ending = particles.read_only_values(&ENDING[channel])?;
            let mut current = particles.values(&CURRENT[channel])?;
            for i in 0..particles.count() {
                if alive[i] {
                    let t = life_fraction(time_alive[i], lifetime);
                    current[i] = lerp(initial[i], ending[i], t);
                }
            }
        }
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_test_utils::{approx_eq, ParticleFixture};

    #[test]
    fn declares_all_twelve_color_properties() {
        let init = StaticColorInitializer::new(Rgba::WHITE, Rgba::default()).unwrap();
        assert_eq!(init.writes().len(), 12);
        let modifier = LinearColorInterpolationModifier::new();
        assert_eq!(modifier.reads().len(), 10);
        assert_eq!(modifier.writes().len(), 4);
    }

    #[test]
    fn fades_alpha_over_lifetime() {
        let mut init =
            StaticColorInitializer::new(Rgba::WHITE, Rgba::new(1.0, 0.0, 0.0, 0.0)).unwrap();
        let mut modifier = LinearColorInterpolationModifier::new();
        let fixture = ParticleFixture::new(2, &init.writes().union(&modifier.reads()));
        let state = EmitterState::new(4.0);

        fixture.initialize(&mut init, &state, &[0, 1]).unwrap();
        assert_eq!(fixture.get(&CURRENT_ALPHA), vec![1.0, 1.0]);

        fixture.set(&IS_ALIVE, &[true, true]);
        fixture.set(&TIME_ALIVE, &[1.0, 3.0]);
        fixture.modify(&mut modifier, &state, 0.0).unwrap();

        let alpha = fixture.get(&CURRENT_ALPHA);
        let green = fixture.get(&CURRENT_GREEN);
        assert!(approx_eq(alpha[0], 0.75) && approx_eq(alpha[1], 0.25));
        assert!(approx_eq(green[1], 0.25));
        assert_eq!(fixture.get(&CURRENT_RED), vec![1.0, 1.0]);
    }

    #[test]
    fn rejects_non_finite_channel() {
        let bad = Rgba::new(0.0, f32::NAN, 0.0, 1.0);
        assert!(StaticColorInitializer::new(bad, Rgba::WHITE).is_err());
    }
}
