//! Textured planar quadrilaterals (parallelograms) and their ray intersection.
//! This module is private but reexported by its parent.

use euclid::{point2, Point2D};

/// Acts as polyfill for float methods
#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use num_traits::float::Float as _;

use crate::math::{FreeCoordinate, FreePoint, FreeVector};
use crate::raycast::Ray;

/// Tolerance used by [`Quad::intersect()`] to reject rays nearly parallel to the plane,
/// and to accept hits very slightly behind the ray origin.
pub const QUAD_EPSILON: FreeCoordinate = 0.000_000_05;

/// Texture coordinate range of a [`Quad`]: the texture coordinates at its origin corner
/// and at the far ends of its two edges.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRange {
    /// U coordinate at the origin.
    pub u0: FreeCoordinate,
    /// U coordinate at the end of the first edge.
    pub u1: FreeCoordinate,
    /// V coordinate at the origin.
    pub v0: FreeCoordinate,
    /// V coordinate at the end of the second edge.
    pub v1: FreeCoordinate,
}

impl UvRange {
    /// The full texture, in its natural orientation.
    pub const FULL: Self = Self::new(0.0, 1.0, 0.0, 1.0);

    #[allow(missing_docs)]
    #[inline]
    pub const fn new(
        u0: FreeCoordinate,
        u1: FreeCoordinate,
        v0: FreeCoordinate,
        v1: FreeCoordinate,
    ) -> Self {
        Self { u0, u1, v0, v1 }
    }
}

/// A parallelogram defined by an origin corner and two edge vectors, with a mapping
/// onto texture coordinates.
///
/// Only the side that the normal `edge_u × edge_v` points out of is visible;
/// [`Quad::intersect()`] ignores rays arriving from behind.
///
/// All derived values are computed on construction; a `Quad` is immutable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    origin: FreePoint,
    edge_u: FreeVector,
    edge_v: FreeVector,
    normal: FreeVector,
    /// Plane constant: `normal · p + plane_offset == 0` for points on the plane.
    plane_offset: FreeCoordinate,
    inv_length_sq_u: FreeCoordinate,
    inv_length_sq_v: FreeCoordinate,
    uv: UvRange,
}

/// Result of [`Quad::intersect()`].
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadHit {
    /// Distance along the ray, in units of the ray's direction vector.
    pub t: FreeCoordinate,
    /// Texture coordinates of the hit point.
    pub uv: Point2D<FreeCoordinate, euclid::UnknownUnit>,
}

impl Quad {
    /// Constructs a quad with corners `v0`, `v1`, and `v2`; the fourth corner is
    /// `v1 + v2 - v0`. `uv` gives the texture coordinates along the `v0 → v1` (U)
    /// and `v0 → v2` (V) edges.
    #[inline]
    pub fn new(v0: FreePoint, v1: FreePoint, v2: FreePoint, uv: UvRange) -> Self {
        Self::from_edges(v0, v1 - v0, v2 - v0, uv)
    }

    fn from_edges(origin: FreePoint, edge_u: FreeVector, edge_v: FreeVector, uv: UvRange) -> Self {
        let normal = edge_u.cross(edge_v).normalize();
        Self {
            origin,
            edge_u,
            edge_v,
            normal,
            plane_offset: -normal.dot(origin.to_vector()),
            inv_length_sq_u: 1.0 / edge_u.square_length(),
            inv_length_sq_v: 1.0 / edge_v.square_length(),
            uv,
        }
    }

    /// Returns the unit normal of the visible side of this quad.
    #[inline]
    pub fn normal(&self) -> FreeVector {
        self.normal
    }

    /// Returns the origin corner of this quad.
    #[inline]
    pub fn origin(&self) -> FreePoint {
        self.origin
    }

    /// Returns a copy of this quad with the function `f` applied to its corner positions.
    ///
    /// `f` must be an affine map; the texture mapping is unchanged.
    #[inline]
    #[must_use]
    pub fn transform(&self, f: impl Fn(FreePoint) -> FreePoint) -> Self {
        let origin = f(self.origin);
        Self::from_edges(
            origin,
            f(self.origin + self.edge_u) - origin,
            f(self.origin + self.edge_v) - origin,
            self.uv,
        )
    }

    /// Rotates this quad a quarter turn about the X axis through the center of the unit cube,
    /// carrying +Z towards -Y (and +Y towards +Z).
    #[inline]
    #[must_use]
    pub fn rotate_x(&self) -> Self {
        self.transform(|p| FreePoint::new(p.x, 1.0 - p.z, p.y))
    }

    /// Rotates this quad a quarter turn about the Z axis through the center of the unit cube,
    /// carrying +Y towards -X (and +X towards +Y).
    #[inline]
    #[must_use]
    pub fn rotate_z(&self) -> Self {
        self.transform(|p| FreePoint::new(1.0 - p.y, p.x, p.z))
    }

    /// Tests whether the ray hits the front side of this quad nearer than `t_limit`.
    ///
    /// Hits up to [`QUAD_EPSILON`] behind the ray origin are accepted, so that a ray
    /// which was advanced exactly onto a surface still sees it.
    #[inline]
    pub fn intersect(&self, ray: &Ray, t_limit: FreeCoordinate) -> Option<QuadHit> {
        let denom = ray.direction.dot(self.normal);
        if !(denom < -QUAD_EPSILON) {
            return None;
        }
        let t = -(self.normal.dot(ray.origin.to_vector()) + self.plane_offset) / denom;
        if !(t > -QUAD_EPSILON && t < t_limit) {
            return None;
        }
        let relative = ray.origin + ray.direction * t - self.origin;
        let u = relative.dot(self.edge_u) * self.inv_length_sq_u;
        let v = relative.dot(self.edge_v) * self.inv_length_sq_v;
        if !((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)) {
            return None;
        }
        Some(QuadHit {
            t,
            uv: point2(
                self.uv.u0 + u * (self.uv.u1 - self.uv.u0),
                self.uv.v0 + v * (self.uv.v1 - self.uv.v0),
            ),
        })
    }
}
