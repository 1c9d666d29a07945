use block_testbed_base::math::{FreeCoordinate, FreeVector, Rgba};
use block_testbed_base::raycast::{Ray, unit_cube_interval};

use crate::MaterialTag;

/// State of following one ray through the voxel for one pixel.
///
/// A [`Trace`] starts out white and infinitely far away; each surface found is offered to
/// [`Trace::commit()`], which keeps it only if it is nearer than everything before it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct Trace {
    /// The ray being followed. Its origin moves forward as the trace enters the voxel and
    /// reaches surfaces.
    pub ray: Ray,
    /// Accumulated color.
    pub color: Rgba,
    /// Normal of the nearest surface hit, or zero if none.
    pub normal: FreeVector,
    /// Parametric distance to the nearest surface hit so far, measured from the current
    /// origin; infinite if none.
    pub t: FreeCoordinate,
    /// Total distance the origin has been moved.
    pub distance: FreeCoordinate,
    /// Material the ray was in before the last transition.
    pub previous_material: MaterialTag,
    /// Material the ray is in after the last transition.
    pub current_material: MaterialTag,
}

impl Trace {
    /// Starts a trace along `ray`.
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            color: Rgba::WHITE,
            normal: FreeVector::zero(),
            t: FreeCoordinate::INFINITY,
            distance: 0.0,
            previous_material: MaterialTag::Air,
            current_material: MaterialTag::Air,
        }
    }

    /// Tests whether the ray meets the unit voxel, and if so and the voxel is ahead, moves
    /// the origin up to its surface.
    ///
    /// Returns whether the ray meets the voxel.
    pub fn enter_voxel(&mut self) -> bool {
        let interval = unit_cube_interval(&self.ray);
        if !interval.is_hit() {
            return false;
        }
        if interval.near > 0.0 {
            self.advance(interval.near);
        }
        true
    }

    /// Records a surface at distance `t` if it is nearer than the current nearest hit.
    ///
    /// Returns whether it was recorded.
    pub fn commit(&mut self, t: FreeCoordinate, normal: FreeVector, color: Rgba) -> bool {
        if t < self.t {
            self.t = t;
            self.normal = normal;
            self.color = color;
            true
        } else {
            false
        }
    }

    /// Moves the origin to the nearest hit recorded so far, which is then at distance zero.
    pub fn advance_to_hit(&mut self) {
        if self.t.is_finite() {
            self.advance(self.t);
            self.t = 0.0;
        }
    }

    /// Records that the ray has passed from one material into another.
    pub fn transition(&mut self, from: MaterialTag, to: MaterialTag) {
        self.previous_material = from;
        self.current_material = to;
    }

    /// Returns the tone-mapped color of this trace, as 8-bit RGB.
    pub fn to_rgb8(&self) -> [u8; 3] {
        tone_map(self.color)
    }

    fn advance(&mut self, t: FreeCoordinate) {
        self.ray = self.ray.advance(t);
        self.distance += t;
    }
}

/// Converts a linear color to displayable 8-bit RGB: each component is square-rooted
/// (an approximation of gamma encoding), clamped to 1, and quantized with rounding.
/// Alpha is ignored.
pub fn tone_map(color: Rgba) -> [u8; 3] {
    let component = |c: f32| -> u8 { (c.max(0.0).sqrt().min(1.0) * 255.0 + 0.5) as u8 };
    [
        component(color.red()),
        component(color.green()),
        component(color.blue()),
    ]
}
