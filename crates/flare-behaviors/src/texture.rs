//! Texture atlas section selection.

use flare_behavior::{Behavior, BehaviorError, Collection, EmitterState, Initializer};
use flare_core::standard::TEXTURE_SECTION_INDEX;
use flare_core::PropertySet;

use crate::util::{invalid, SeededRng};

/// Picks a texture atlas section per particle, uniform in
/// `[min_index, max_index]`.
#[derive(Debug)]
pub struct RandomTextureSectionInitializer {
    min_index: i32,
    max_index: i32,
    rng: SeededRng,
}

impl RandomTextureSectionInitializer {
    /// Sections `min_index..=max_index`. Indices must be non-negative.
    pub fn new(min_index: i32, max_index: i32, seed: u64) -> Result<Self, BehaviorError> {
        if min_index < 0 {
            return Err(invalid(format!(
                "texture section index must be >= 0, got {min_index}"
            )));
        }
        if min_index > max_index {
            return Err(invalid(format!(
                "texture section range is inverted: {min_index} > {max_index}"
            )));
        }
        Ok(Self {
            min_index,
            max_index,
            rng: SeededRng::new(seed),
        })
    }
}

impl Behavior for RandomTextureSectionInitializer {
    fn name(&self) -> &str {
        "RandomTextureSectionInitializer"
    }
}

impl Initializer for RandomTextureSectionInitializer {
    fn writes(&self) -> PropertySet {
        PropertySet::empty().with(TEXTURE_SECTION_INDEX)
    }

    fn initialize(
        &mut self,
        _emitter: &EmitterState,
        particles: &Collection<'_>,
        new_indices: &[usize],
    ) -> Result<(), BehaviorError> {
        let mut sections = particles.values(&TEXTURE_SECTION_INDEX)?;
        for &i in new_indices {
            sections[i] = self.rng.range_i32(self.min_index, self.max_index);
        }
        Ok(())
    }

    fn clone_initializer(&self) -> Box<dyn Initializer> {
        Box::new(Self {
            min_index: self.min_index,
            max_index: self.max_index,
            rng: self.rng.restarted(),
        })
    }
}
