//! Property keys, value types, and typed property handles.
//!
//! A property is one named attribute of every particle (position, size,
//! colour channel, ...). Storage is keyed by [`PropertyKey`], the pair of
//! a [`PropertyType`] tag and a name, so `Float "Index"` and `Int "Index"`
//! are independent columns.
//!
//! Code normally refers to properties through a [`Property<T>`] handle,
//! which fixes the value type at compile time:
//!
//! ```
//! use flare_core::{Property, PropertyType};
//!
//! const HEAT: Property<f32> = Property::new("Heat");
//! assert_eq!(HEAT.key().value_type(), PropertyType::Float);
//! assert_eq!(HEAT.name(), "Heat");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Value type tag of a property column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyType {
    /// 32-bit float values.
    Float,
    /// 32-bit signed integer values.
    Int,
    /// Boolean flags.
    Bool,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "f32"),
            Self::Int => write!(f, "i32"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for i32 {}
    impl Sealed for bool {}
}

/// A Rust type that can be stored in a property column.
///
/// Sealed: the supported set is closed to `f32`, `i32` and `bool`.
pub trait PropertyValue: Copy + Default + PartialEq + fmt::Debug + 'static + sealed::Sealed {
    /// The column tag for this type.
    const TYPE: PropertyType;
}

impl PropertyValue for f32 {
    const TYPE: PropertyType = PropertyType::Float;
}

impl PropertyValue for i32 {
    const TYPE: PropertyType = PropertyType::Int;
}

impl PropertyValue for bool {
    const TYPE: PropertyType = PropertyType::Bool;
}

/// Untyped identity of a property column: `(value type, name)`.
///
/// Two keys are equal iff both the type and the name match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey {
    value_type: PropertyType,
    name: &'static str,
}

impl PropertyKey {
    /// Build a key from a type tag and name.
    pub const fn new(value_type: PropertyType, name: &'static str) -> Self {
        Self { value_type, name }
    }

    /// The column's value type.
    pub fn value_type(&self) -> PropertyType {
        self.value_type
    }

    /// The property name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value_type)
    }
}

/// A property name bound to its value type at compile time.
///
/// Handles are `const`-constructible so behaviors can declare the
/// properties they touch as associated constants.
pub struct Property<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PropertyValue> Property<T> {
    /// Declare a property of type `T` named `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The untyped key for this property.
    pub const fn key(&self) -> PropertyKey {
        PropertyKey::new(T::TYPE, self.name)
    }
}

impl<T> Property<T> {
    /// The property name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: deriving would add a spurious `T: Clone` / `T: Eq` bound.
impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for Property<T> {}

impl<T> Hash for Property<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T: PropertyValue> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property<{}>({:?})", T::TYPE, self.name)
    }
}

impl<T: PropertyValue> From<Property<T>> for PropertyKey {
    fn from(p: Property<T>) -> Self {
        p.key()
    }
}
