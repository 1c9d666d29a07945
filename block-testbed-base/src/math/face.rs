//! Axis-aligned unit vectors: the [`Face6`] type.
//! This module is private but reexported by its parent.

use crate::math::{Axis, FreeCoordinate, FreeVector};

/// Identifies a face of a cube or an orthogonal unit vector.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, exhaust::Exhaust)]
#[repr(u8)]
pub enum Face6 {
    /// Negative X; the face whose normal vector is `(-1, 0, 0)`; west.
    NX = 1,
    /// Negative Y; the face whose normal vector is `(0, -1, 0)`; downward.
    NY = 2,
    /// Negative Z; the face whose normal vector is `(0, 0, -1)`; north.
    NZ = 3,
    /// Positive X; the face whose normal vector is `(1, 0, 0)`; east.
    PX = 4,
    /// Positive Y; the face whose normal vector is `(0, 1, 0)`; upward.
    PY = 5,
    /// Positive Z; the face whose normal vector is `(0, 0, 1)`; south.
    PZ = 6,
}

impl Face6 {
    /// All the values of [`Face6`].
    pub const ALL: [Face6; 6] = [
        Face6::NX,
        Face6::NY,
        Face6::NZ,
        Face6::PX,
        Face6::PY,
        Face6::PZ,
    ];

    /// Returns which axis this face's normal vector is parallel to.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::NX | Self::PX => Axis::X,
            Self::NY | Self::PY => Axis::Y,
            Self::NZ | Self::PZ => Axis::Z,
        }
    }

    /// Returns whether this face is a “positive” face: one whose unit vector's nonzero
    /// coordinate is positive.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::PX | Self::PY | Self::PZ)
    }

    /// Returns the opposite face (maps [`PX`](Self::PX) to [`NX`](Self::NX) and so on).
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Face6 {
        match self {
            Face6::NX => Face6::PX,
            Face6::NY => Face6::PY,
            Face6::NZ => Face6::PZ,
            Face6::PX => Face6::NX,
            Face6::PY => Face6::NY,
            Face6::PZ => Face6::NZ,
        }
    }

    /// Returns the vector normal to this face, of length 1.
    #[inline]
    pub fn normal_vector(self) -> FreeVector {
        let mut v = FreeVector::zero();
        v[self.axis()] = if self.is_positive() { 1.0 } else { -1.0 };
        v
    }

    /// Returns the face whose normal is the given exactly-axis-aligned vector with
    /// the given sign, or [`None`] if `sign` is zero.
    #[inline]
    pub fn from_axis_sign(axis: Axis, sign: FreeCoordinate) -> Option<Self> {
        if sign > 0.0 {
            Some(axis.positive_face())
        } else if sign < 0.0 {
            Some(axis.negative_face())
        } else {
            None
        }
    }
}
