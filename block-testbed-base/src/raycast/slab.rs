use crate::math::{Axis, FreeCoordinate};
use crate::raycast::Ray;

/// Parametric interval over which a ray is inside the unit cube, as computed by
/// [`unit_cube_interval()`].
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    /// Parameter at which the ray enters the cube. May be negative (the origin is inside
    /// the cube or past it).
    pub near: FreeCoordinate,
    /// Parameter at which the ray leaves the cube.
    pub far: FreeCoordinate,
}

impl Interval {
    /// An interval which no ray is ever inside.
    pub const EMPTY: Self = Self {
        near: FreeCoordinate::INFINITY,
        far: FreeCoordinate::NEG_INFINITY,
    };

    /// Whether the ray meets the cube at all, at or ahead of its origin.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.near <= self.far && self.far >= 0.0
    }
}

/// Computes where `ray` enters and leaves the unit cube `[0, 1]³` using the slab method.
///
/// Each axis along which the ray moves bounds the interval by the two planes of that axis.
/// An axis along which the ray does not move contributes no bound if the origin lies
/// between its planes, and makes the interval [empty](Interval::EMPTY) otherwise.
///
/// ```
/// use block_testbed_base::raycast::{Ray, unit_cube_interval};
///
/// let interval = unit_cube_interval(&Ray::new([-1.0, 0.5, 0.5], [1.0, 0.0, 0.0]));
/// assert_eq!((interval.near, interval.far), (1.0, 2.0));
/// assert!(interval.is_hit());
/// ```
#[inline]
pub fn unit_cube_interval(ray: &Ray) -> Interval {
    let mut near = FreeCoordinate::NEG_INFINITY;
    let mut far = FreeCoordinate::INFINITY;
    for axis in Axis::ALL {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d == 0.0 {
            if !(0.0..=1.0).contains(&o) {
                return Interval::EMPTY;
            }
            continue;
        }
        let mut t1 = -o / d;
        let mut t2 = (1.0 - o) / d;
        if t1 > t2 {
            core::mem::swap(&mut t1, &mut t2);
        }
        near = near.max(t1);
        far = far.min(t2);
    }
    Interval { near, far }
}
