//! Mathematical utilities and decisions.

use euclid::{Point2D, Point3D, Vector3D};

mod axis;
pub use axis::*;
mod color;
pub use color::*;
mod face;
pub use face::*;
mod matrix;
pub use matrix::*;
mod quad;
pub use quad::*;

/// Unit-of-measure type for coordinates in the frame of the single rendered voxel,
/// whose solid volume is the unit cube `[0, 1]³`.
#[expect(clippy::exhaustive_enums)]
#[derive(Debug, Eq, PartialEq)]
pub enum Cube {}

/// Unit-of-measure type for integer coordinates of texture texels and sprite grid cells.
#[expect(clippy::exhaustive_enums)]
#[derive(Debug, Eq, PartialEq)]
pub enum Texel {}

/// Coordinates that are not locked to the texel grid.
///
/// Note: Because `GridCoordinate = i32` and `FreeCoordinate = f64`, we can
/// use the standard `From` trait to convert from one to the other.
pub type FreeCoordinate = f64;

/// Coordinates that are locked to the texel grid.
pub type GridCoordinate = i32;

/// Positions in the voxel's coordinate system.
pub type FreePoint = Point3D<FreeCoordinate, Cube>;

/// Vectors in the voxel's coordinate system.
pub type FreeVector = Vector3D<FreeCoordinate, Cube>;

/// Position of a texel or sprite grid cell.
pub type TexelPoint = Point2D<GridCoordinate, Texel>;

/// Converts degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: FreeCoordinate) -> FreeCoordinate {
    degrees * (core::f64::consts::PI / 180.0)
}

/// Returns `-1`, `0`, or `1` according to the sign of `value`, treating both zeroes
/// (and NaN) as zero.
///
/// This differs from [`f64::signum()`], which reports the sign bit of zeroes.
#[inline]
pub fn zero_signum(value: FreeCoordinate) -> FreeCoordinate {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
