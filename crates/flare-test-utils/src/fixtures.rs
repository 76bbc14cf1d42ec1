//! Mock behaviors for emitter tests.
//!
//! - [`FixedCountTrigger`] emits a scripted number of particles per tick.
//! - [`ConstantInitializer`] writes one constant into one float property.
//! - [`RecordingModifier`] records what it saw on every call.
//! - [`UndeclaredWriteModifier`] writes a property it never declared.
//! - [`FailingModifier`] fails deterministically after N calls.

use flare_behavior::{
    Behavior, BehaviorError, Collection, EmitterState, Initializer, Modifier, Trigger,
};
use flare_core::standard::IS_ALIVE;
use flare_core::{Property, PropertySet};

/// Returns `counts[tick]` on each call, then `after` once the script runs out.
#[derive(Clone, Debug)]
pub struct FixedCountTrigger {
    counts: Vec<u32>,
    after: u32,
    tick: usize,
}

impl FixedCountTrigger {
    /// Emit `count` particles every tick.
    pub fn new(count: u32) -> Self {
        Self {
            counts: Vec::new(),
            after: count,
            tick: 0,
        }
    }

    /// Emit `counts` in order, then nothing.
    pub fn sequence(counts: Vec<u32>) -> Self {
        Self {
            counts,
            after: 0,
            tick: 0,
        }
    }

    /// Calls to `determine_count` so far.
    pub fn calls(&self) -> usize {
        self.tick
    }
}

impl Behavior for FixedCountTrigger {
    fn name(&self) -> &str {
        "FixedCountTrigger"
    }
}

impl Trigger for FixedCountTrigger {
    fn min_particles(&self) -> u32 {
        self.counts.iter().copied().chain([self.after]).min().unwrap_or(0)
    }

    fn max_particles(&self) -> u32 {
        self.counts.iter().copied().chain([self.after]).max().unwrap_or(0)
    }

    fn determine_count(&mut self, _emitter: &mut EmitterState, _dt: f32) -> u32 {
        let count = self.counts.get(self.tick).copied().unwrap_or(self.after);
        self.tick += 1;
        count
    }

    fn clone_trigger(&self) -> Box<dyn Trigger> {
        Box::new(Self {
            tick: 0,
            ..self.clone()
        })
    }
}

/// Writes `value` into `property` for every claimed index and remembers
/// the indices it was given last.
#[derive(Clone, Debug)]
pub struct ConstantInitializer {
    pub property: Property<f32>,
    pub value: f32,
    pub last_indices: Vec<usize>,
}

impl ConstantInitializer {
    pub fn new(property: Property<f32>, value: f32) -> Self {
        Self {
            property,
            value,
            last_indices: Vec::new(),
        }
    }
}

impl Behavior for ConstantInitializer {
    fn name(&self) -> &str {
        "ConstantInitializer"
    }
}

impl Initializer for ConstantInitializer {
    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(self.property)
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let mut values = particles.values(&self.property)?;
        for &i in new_indices {
            values[i] = self.value;
        }
        self.last_indices = new_indices.to_vec();
        Ok(())
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(Self::new(self.property, self.value))
    }
}

/// One observation made by [`RecordingModifier`].
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub dt: f32,
    pub count: usize,
    pub alive: usize,
}

/// Reads `IsAlive` and records the collection it was handed on each call.
#[derive(Clone, Debug, Default)]
pub struct RecordingModifier {
    pub observations: Vec<Observation>,
}

impl RecordingModifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for RecordingModifier {
    fn name(&self) -> &str {
        "RecordingModifier"
    }
}

impl Modifier for RecordingModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty().with(IS_ALIVE)
    }

    fn writes(&self) -> PropertySet {
        PropertySet::empty()
    }

    fn update(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        dt: f32,
    ) -> Result<(), BehaviorError> {
        let alive = particles.read_only_values(&IS_ALIVE)?;
        self.observations.push(Observation {
            dt,
            count: particles.count(),
            alive: alive.iter().filter(|&&a| a).count(),
        });
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(Self::new())
    }
}

/// Declares nothing, then tries to write `property`.
#[derive(Clone, Debug)]
pub struct UndeclaredWriteModifier {
    pub property: Property<f32>,
}

impl Behavior for UndeclaredWriteModifier {
    fn name(&self) -> &str {
        "UndeclaredWriteModifier"
    }
}

impl Modifier for UndeclaredWriteModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty()
    }

    fn writes(&self) -> PropertySet {
        PropertySet::empty()
    }

    fn update(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        _dt: f32,
    ) -> Result<(), BehaviorError> {
        particles.values(&self.property)?.fill(1.0);
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(self.clone())
    }
}

/// Succeeds `succeed_count` times, then fails on every call.
#[derive(Clone, Debug)]
pub struct FailingModifier {
    pub succeed_count: usize,
    calls: usize,
}

impl FailingModifier {
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            calls: 0,
        }
    }
}

impl Behavior for FailingModifier {
    fn name(&self) -> &str {
        "FailingModifier"
    }
}

impl Modifier for FailingModifier {
    fn reads(&self) -> PropertySet {
        PropertySet::empty()
    }

    fn writes(&self) -> PropertySet {
        PropertySet::empty()
    }

    fn update(
        &mut self,
        _emitter: &EmitterState,
        _particles: &Collection<'_>,
        _dt: f32,
    ) -> Result<(), BehaviorError> {
        self.calls += 1;
        if self.calls > self.succeed_count {
            return Err(BehaviorError::Failed {
                reason: format!("failed on call {}", self.calls),
            });
        }
        Ok(())
    }

    fn clone_modifier(&self) -> Box<dyn Modifier> {
        Box::new(Self::new(self.succeed_count))
    }
}
