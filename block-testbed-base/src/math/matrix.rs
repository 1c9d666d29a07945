//! Floating-point rotation matrices.
//! This module is private but reexported by its parent.

use core::ops;

/// Acts as polyfill for float methods
#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use num_traits::float::Float as _;

use crate::math::{FreeCoordinate, FreePoint, FreeVector};

/// A 3×3 linear transformation matrix in [`FreeCoordinate`]s, used for orienting the camera.
//---
// Design note: `euclid::Transform3D` would also serve, but it is a 4×4 matrix
// and its rotation constructors use the opposite handedness from the orbit camera's
// definition; keeping our own type makes the yaw/pitch formulas directly checkable.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3 {
    /// First column
    pub x: FreeVector,
    /// Second column
    pub y: FreeVector,
    /// Third column
    pub z: FreeVector,
}

impl Matrix3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        x: FreeVector::new(1.0, 0.0, 0.0),
        y: FreeVector::new(0.0, 1.0, 0.0),
        z: FreeVector::new(0.0, 0.0, 1.0),
    };

    /// Rotation by `angle` radians about the X axis, carrying +Y towards +Z.
    #[inline]
    pub fn rotate_x(angle: FreeCoordinate) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x: FreeVector::new(1.0, 0.0, 0.0),
            y: FreeVector::new(0.0, c, s),
            z: FreeVector::new(0.0, -s, c),
        }
    }

    /// Rotation by `angle` radians about the Y axis, carrying +Z towards +X.
    #[inline]
    pub fn rotate_y(angle: FreeCoordinate) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x: FreeVector::new(c, 0.0, -s),
            y: FreeVector::new(0.0, 1.0, 0.0),
            z: FreeVector::new(s, 0.0, c),
        }
    }

    /// Applies this matrix to the given vector.
    #[inline]
    pub fn transform_vector(&self, v: FreeVector) -> FreeVector {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Applies this matrix to the given point, treating it as a vector from the origin.
    #[inline]
    pub fn transform_point(&self, p: FreePoint) -> FreePoint {
        self.transform_vector(p.to_vector()).to_point()
    }

    /// Returns the transpose, which is the inverse for the rotation matrices this type
    /// is used for.
    #[inline]
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            x: FreeVector::new(self.x.x, self.y.x, self.z.x),
            y: FreeVector::new(self.x.y, self.y.y, self.z.y),
            z: FreeVector::new(self.x.z, self.y.z, self.z.z),
        }
    }
}

impl Default for Matrix3 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Composition: `(a * b).transform_vector(v) == a.transform_vector(b.transform_vector(v))`.
impl ops::Mul for Matrix3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.transform_vector(rhs.x),
            y: self.transform_vector(rhs.y),
            z: self.transform_vector(rhs.z),
        }
    }
}
