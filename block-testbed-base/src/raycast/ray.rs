/// Acts as polyfill for float methods
#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use num_traits::float::Float as _;

use crate::math::{FreeCoordinate, FreePoint, FreeVector};

/// A ray; a half-infinite line segment.
///
/// Parametric distances (“t”) along a ray are in units of the length of
/// [`direction`](Self::direction), so they are true distances only when the direction
/// has been normalized.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The sole endpoint of the ray.
    pub origin: FreePoint,

    /// The direction in which the ray extends infinitely.
    pub direction: FreeVector,
}

impl Ray {
    /// Constructs a [`Ray`] from convertible types (e.g. tuples or 3-element arrays).
    /// Other than the use of [`Into`], this is equivalent to a struct literal.
    ///
    /// ```
    /// use block_testbed_base::euclid::{point3, vec3};
    /// use block_testbed_base::raycast::Ray;
    ///
    /// assert_eq!(
    ///     Ray::new([1., 2., 3.], [4., 5., 6.]),
    ///     Ray {
    ///         origin: point3(1., 2., 3.),
    ///         direction: vec3(4., 5., 6.),
    ///     }
    /// );
    /// ```
    #[allow(clippy::missing_inline_in_public_items)] // is generic already
    pub fn new(origin: impl Into<FreePoint>, direction: impl Into<FreeVector>) -> Self {
        Self {
            origin: origin.into(),
            direction: direction.into(),
        }
    }

    /// Returns this ray with its direction scaled to unit length.
    ///
    /// A zero direction is left as zero.
    #[must_use]
    #[inline]
    pub fn normalized(self) -> Self {
        Self {
            origin: self.origin,
            direction: self.direction.try_normalize().unwrap_or(self.direction),
        }
    }

    /// Returns the point at parametric distance `t` along the ray.
    #[inline]
    pub fn point_at(&self, t: FreeCoordinate) -> FreePoint {
        self.origin + self.direction * t
    }

    /// Moves the origin `t` units along the ray, keeping the direction.
    #[must_use]
    #[inline]
    pub fn advance(self, t: FreeCoordinate) -> Self {
        Self {
            origin: self.point_at(t),
            direction: self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::{point3, vec3};

    #[test]
    fn advance_moves_along_direction() {
        let ray = Ray::new([1., 0., 0.], [0., 2., 0.]).advance(1.5);
        assert_eq!(ray.origin, point3(1., 3., 0.));
        assert_eq!(ray.direction, vec3(0., 2., 0.));
    }

    #[test]
    fn normalized_zero_is_zero() {
        let ray = Ray::new([0., 0., 0.], [0., 0., 0.]);
        assert_eq!(ray.normalized(), ray);
        assert_eq!(
            Ray::new([0., 0., 0.], [0., 0., -4.]).normalized().direction,
            vec3(0., 0., -1.)
        );
    }
}
