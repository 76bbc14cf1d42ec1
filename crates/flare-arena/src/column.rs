//! Dense typed columns and the relocation primitives used by growth and
//! defragmentation.
//!
//! A [`Column`] is one `Vec` per property, tagged by value type. Columns
//! never shrink and are never cleared on release; relocation copies only
//! the live ranges described by a list of [`Move`]s.

use flare_core::{PropertyType, PropertyValue};

/// One dense property array.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// `f32` values.
    Float(Vec<f32>),
    /// `i32` values.
    Int(Vec<i32>),
    /// `bool` values.
    Bool(Vec<bool>),
}

/// A contiguous copy from `src` to `dst`, both in slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    /// Start of the range in the current layout.
    pub src: usize,
    /// Start of the range in the new layout.
    pub dst: usize,
    /// Number of slots.
    pub len: usize,
}

impl Column {
    /// Create a default-filled column of the given type and length.
    pub fn new(value_type: PropertyType, len: usize) -> Self {
        match value_type {
            PropertyType::Float => Self::Float(vec![0.0; len]),
            PropertyType::Int => Self::Int(vec![0; len]),
            PropertyType::Bool => Self::Bool(vec![false; len]),
        }
    }

    /// The column's value type.
    pub fn value_type(&self) -> PropertyType {
        match self {
            Self::Float(_) => PropertyType::Float,
            Self::Int(_) => PropertyType::Int,
            Self::Bool(_) => PropertyType::Bool,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    /// Whether the column has zero slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a fresh column of `new_len` slots holding the moved ranges.
    ///
    /// Slots not covered by any move are default-filled.
    pub fn relocated(&self, new_len: usize, moves: &[Move]) -> Self {
        match self {
            Self::Float(v) => Self::Float(relocate(v, new_len, moves)),
            Self::Int(v) => Self::Int(relocate(v, new_len, moves)),
            Self::Bool(v) => Self::Bool(relocate(v, new_len, moves)),
        }
    }

    /// Apply moves in place.
    ///
    /// Every move must satisfy `dst <= src` and moves must be ordered by
    /// ascending `dst`, so a later move never reads a slot an earlier one
    /// has overwritten.
    pub fn compact(&mut self, moves: &[Move]) {
        match self {
            Self::Float(v) => compact(v, moves),
            Self::Int(v) => compact(v, moves),
            Self::Bool(v) => compact(v, moves),
        }
    }
}

fn relocate<T: Copy + Default>(old: &[T], new_len: usize, moves: &[Move]) -> Vec<T> {
    let mut out = vec![T::default(); new_len];
    for m in moves {
        out[m.dst..m.dst + m.len].copy_from_slice(&old[m.src..m.src + m.len]);
    }
    out
}

fn compact<T: Copy>(data: &mut [T], moves: &[Move]) {
    for m in moves {
        debug_assert!(m.dst <= m.src, "in-place compaction must move left");
        if m.src != m.dst {
            data.copy_within(m.src..m.src + m.len, m.dst);
        }
    }
}

/// A [`PropertyValue`] that can be viewed inside a [`Column`].
///
/// Implemented for every `PropertyValue`; the bound exists so typed
/// accessors can pick the matching variant.
pub trait ColumnValue: PropertyValue {
    /// Borrow the column as `&[Self]`, or `None` on a type mismatch.
    fn slice(column: &Column) -> Option<&[Self]>;
    /// Borrow the column as `&mut [Self]`, or `None` on a type mismatch.
    fn slice_mut(column: &mut Column) -> Option<&mut [Self]>;
}

macro_rules! column_value {
    ($ty:ty, $variant:ident) => {
        impl ColumnValue for $ty {
            fn slice(column: &Column) -> Option<&[Self]> {
                match column {
                    Column::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut(column: &mut Column) -> Option<&mut [Self]> {
                match column {
                    Column::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

column_value!(f32, Float);
column_value!(i32, Int);
column_value!(bool, Bool);

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(column: &Column) -> &[f32] {
        f32::slice(column).unwrap()
    }

    #[test]
    fn new_column_is_default_filled() {
        let col = Column::new(PropertyType::Bool, 4);
        assert_eq!(col.len(), 4);
        assert_eq!(bool::slice(&col).unwrap(), &[false; 4]);
    }

    #[test]
    fn typed_view_rejects_mismatch() {
        let mut col = Column::new(PropertyType::Int, 2);
        assert!(f32::slice(&col).is_none());
        assert!(bool::slice_mut(&mut col).is_none());
        assert!(i32::slice_mut(&mut col).is_some());
    }

    #[test]
    fn relocated_copies_only_moved_ranges() {
        let col = Column::Float(vec![1.0, 2.0, 3.0, 4.0]);
        let moves = [Move { src: 2, dst: 0, len: 2 }];
        let out = col.relocated(6, &moves);
        assert_eq!(floats(&out), &[3.0, 4.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn compact_preserves_order_and_leaves_stale_tail() {
        let mut col = Column::Float(vec![9.0, 1.0, 2.0, 9.0, 3.0]);
        let moves = [
            Move { src: 1, dst: 0, len: 2 },
            Move { src: 4, dst: 2, len: 1 },
        ];
        col.compact(&moves);
        // Slots past the compacted region keep their previous contents.
        assert_eq!(floats(&col), &[1.0, 2.0, 3.0, 9.0, 3.0]);
    }

    #[test]
    fn overlapping_left_shift_is_safe() {
        let mut col = Column::Int(vec![0, 1, 2, 3, 4]);
        col.compact(&[Move { src: 1, dst: 0, len: 4 }]);
        assert_eq!(i32::slice(&col).unwrap(), &[1, 2, 3, 4, 4]);
    }
}
