//! Named groups of emitters owned by the host.
//!
//! A host typically maps each group to one draw batch. The registry is a
//! plain value; create one per world or scene.

use indexmap::IndexMap;

use crate::emitter::Emitter;
use crate::error::EmitterError;

/// Emitters grouped by name, in insertion order.
#[derive(Debug, Default)]
pub struct EmitterRegistry {
    groups: IndexMap<String, Vec<Emitter>>,
}

impl EmitterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `emitter` to `group`, creating the group if needed.
    pub fn insert(&mut self, group: impl Into<String>, emitter: Emitter) {
        self.groups.entry(group.into()).or_default().push(emitter);
    }

    /// Emitters in `group`.
    pub fn group(&self, name: &str) -> Option<&[Emitter]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Mutable access to the emitters in `group`.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut [Emitter]> {
        self.groups.get_mut(name).map(Vec::as_mut_slice)
    }

    /// Remove `group` and hand back its emitters. Dropping them releases
    /// their reservations.
    pub fn remove_group(&mut self, name: &str) -> Option<Vec<Emitter>> {
        self.groups.shift_remove(name)
    }

    /// Group names in insertion order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.keys().map(String::as_str)
    }

    /// Total emitters across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether no emitters are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every emitter, group by group.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Emitter)> + '_ {
        self.groups
            .iter()
            .flat_map(|(name, emitters)| emitters.iter().map(move |e| (name.as_str(), e)))
    }

    /// Update every emitter by `dt`, group by group.
    ///
    /// Stops at the first failing emitter.
    pub fn update_all(&mut self, dt: f32) -> Result<(), EmitterError> {
        for emitter in self.groups.values_mut().flatten() {
            emitter.update(dt)?;
        }
        Ok(())
    }
}
