//! The [`PropertySet`] declaration set.

use indexmap::IndexSet;

use crate::property::{Property, PropertyKey, PropertyValue};

/// An insertion-ordered set of property keys.
///
/// Behaviors use property sets to declare which properties they read and
/// write; collections use them to enforce those declarations. Equality
/// ignores insertion order.
///
/// ```
/// use flare_core::standard::{IS_ALIVE, POSITION_X};
/// use flare_core::PropertySet;
///
/// let set = PropertySet::empty().with(IS_ALIVE).with(POSITION_X);
/// assert!(set.contains(&POSITION_X.key()));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertySet {
    keys: IndexSet<PropertyKey>,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style insert of a typed property.
    pub fn with<T: PropertyValue>(mut self, property: Property<T>) -> Self {
        self.keys.insert(property.key());
        self
    }

    /// Insert a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: PropertyKey) -> bool {
        self.keys.insert(key)
    }

    /// Whether the set contains `key`.
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.keys.contains(key)
    }

    /// Return the union of two sets, preserving `self`'s order first.
    pub fn union(&self, other: &Self) -> Self {
        self.keys.union(&other.keys).copied().collect()
    }

    /// Whether every key of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.keys.is_subset(&other.keys)
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Iterate over the keys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyKey> + '_ {
        self.keys.iter()
    }
}

impl FromIterator<PropertyKey> for PropertySet {
    fn from_iter<I: IntoIterator<Item = PropertyKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl Extend<PropertyKey> for PropertySet {
    fn extend<I: IntoIterator<Item = PropertyKey>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a PropertyKey;
    type IntoIter = indexmap::set::Iter<'a, PropertyKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
