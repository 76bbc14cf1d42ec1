//! Allocator configuration parameters.

use crate::error::ArenaError;

/// Configuration for the index-range allocator.
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocatorConfig {
    /// Number of slots allocated up front for every property column.
    ///
    /// Default: 50. Zero is allowed; the first reservation grows it.
    pub initial_capacity: usize,

    /// Multiplier applied when capacity has to grow.
    ///
    /// The new capacity is the larger of `capacity * growth_factor` and
    /// `(used + requested) * growth_factor`. Default: 1.2. Must be finite
    /// and greater than 1.
    pub growth_factor: f64,
}

impl AllocatorConfig {
    /// Default slot count.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 50;

    /// Default growth multiplier.
    pub const DEFAULT_GROWTH_FACTOR: f64 = 1.2;

    /// Create a config with the given initial capacity and default growth.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "growth_factor must be finite and > 1.0 (got {})",
                    self.growth_factor
                ),
            });
        }
        Ok(())
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
