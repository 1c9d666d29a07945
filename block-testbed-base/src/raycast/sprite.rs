use euclid::{Size2D, point2};

/// Acts as polyfill for float methods
#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use num_traits::float::Float as _;

use crate::math::{
    Axis, Face6, FreeCoordinate, GridCoordinate, Texel, TexelPoint, zero_signum,
};
use crate::raycast::Ray;

/// A two-dimensional grid of cells, each of which is either occupied or empty,
/// such as the opaque texels of a sprite texture.
///
/// The grid's X axis corresponds to the world X axis and its second axis to the world
/// Z axis.
pub trait OccupancyMask {
    /// Size of the grid in cells. Cells outside of `0..width` × `0..height` are never
    /// occupied.
    fn size(&self) -> Size2D<GridCoordinate, Texel>;

    /// Returns whether the given cell is occupied.
    ///
    /// Implementations must return `false` for cells outside of [`size()`](Self::size).
    fn occupied(&self, cell: TexelPoint) -> bool;
}

impl<T: OccupancyMask + ?Sized> OccupancyMask for &T {
    #[inline]
    fn size(&self) -> Size2D<GridCoordinate, Texel> {
        (**self).size()
    }
    #[inline]
    fn occupied(&self, cell: TexelPoint) -> bool {
        (**self).occupied(cell)
    }
}

/// Placement of an [`OccupancyMask`] in space: a thin horizontal slab between two Y
/// planes, whose cells are squares of `1 / cells_per_unit` world units.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteGeometry {
    /// Y coordinate of the bottom face of the slab.
    pub lower_y: FreeCoordinate,
    /// Y coordinate of the top face of the slab.
    pub upper_y: FreeCoordinate,
    /// Number of grid cells per world unit on the X and Z axes.
    pub cells_per_unit: FreeCoordinate,
    /// Offset, in cells, added to the scaled X and Z coordinates to obtain grid coordinates.
    pub grid_offset: [FreeCoordinate; 2],
}

/// Result of [`SpriteGeometry::intersect()`].
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteHit {
    /// Distance along the ray, in units of the ray's direction vector.
    pub t: FreeCoordinate,
    /// The face of the occupied cell's volume which the ray entered through.
    pub face: Face6,
    /// The occupied cell that was hit.
    pub cell: TexelPoint,
}

impl SpriteGeometry {
    /// Geometry of the sprite drawn in sprite render mode: a one-texel-thick
    /// 16 × 16 slab whose bottom face is at the middle of the voxel.
    pub const STANDARD: Self = Self {
        lower_y: 0.5,
        upper_y: 0.5 + 1.0 / 16.0,
        cells_per_unit: 16.0,
        grid_offset: [0.5, 0.5],
    };

    /// Converts a world position's X and Z coordinates to continuous grid coordinates.
    #[inline]
    fn to_grid(&self, x: FreeCoordinate, z: FreeCoordinate) -> [FreeCoordinate; 2] {
        [
            x * self.cells_per_unit + self.grid_offset[0],
            z * self.cells_per_unit + self.grid_offset[1],
        ]
    }

    /// Finds the first occupied cell of `mask` which `ray` passes into, at a distance less
    /// than `t_limit`.
    ///
    /// If the ray starts outside the slab, it first travels to the slab face it is heading
    /// towards; if the cell there is occupied, that face is the hit. Otherwise (or if the ray
    /// starts inside the slab) the ray's horizontal path is walked cell by cell until it
    /// reaches an occupied cell or leaves the slab.
    ///
    /// A ray whose origin is inside an occupied cell never hits anything.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn intersect(
        &self,
        ray: &Ray,
        t_limit: FreeCoordinate,
        mask: &impl OccupancyMask,
    ) -> Option<SpriteHit> {
        let origin = ray.origin;
        let dir = ray.direction;
        let inside = (self.lower_y..=self.upper_y).contains(&origin.y);

        // Vertical phase: find the parameter at which the ray is within the slab.
        let t_offset = if inside {
            let [gx, gz] = self.to_grid(origin.x, origin.z);
            if mask.occupied(floor_cell(gx, gz)) {
                // Embedded in the sprite; nothing to see.
                return None;
            }
            0.0
        } else {
            if dir.y == 0.0 {
                return None;
            }
            let t_offset = if dir.y > 0.0 {
                (self.lower_y - origin.y) / dir.y
            } else {
                (self.upper_y - origin.y) / dir.y
            };
            if !(t_offset >= 0.0) || !(t_offset < t_limit) {
                return None;
            }
            let [gx, gz] = self.to_grid(
                origin.x + dir.x * t_offset,
                origin.z + dir.z * t_offset,
            );
            let cell = floor_cell(gx, gz);
            if mask.occupied(cell) {
                return Some(SpriteHit {
                    t: t_offset,
                    face: Face6::from_axis_sign(Axis::Y, -dir.y)?,
                    cell,
                });
            }
            t_offset
        };

        // Horizontal phase: the parameter, relative to t_offset, at which the ray leaves
        // the slab through its far face.
        let t_slab_exit = if dir.y > 0.0 {
            (self.upper_y - origin.y) / dir.y - t_offset
        } else if dir.y < 0.0 {
            (self.lower_y - origin.y) / dir.y - t_offset
        } else {
            FreeCoordinate::INFINITY
        };

        let start = self.to_grid(
            origin.x + dir.x * t_offset,
            origin.z + dir.z * t_offset,
        );
        let walk = GridWalk {
            start,
            step: [zero_signum(dir.x), zero_signum(dir.z)],
            rate: [
                dir.x.abs() * self.cells_per_unit,
                dir.z.abs() * self.cells_per_unit,
            ],
        };
        let t_exit = t_slab_exit
            .min(t_limit - t_offset)
            .min(walk.t_leaving(mask.size()));

        let (t, axis_index, cell) = walk.first_occupied(mask, t_exit)?;
        let axis = [Axis::X, Axis::Z][axis_index];
        Some(SpriteHit {
            t: t + t_offset,
            face: Face6::from_axis_sign(axis, -walk.step[axis_index])?,
            cell,
        })
    }
}

#[inline]
fn floor_cell(x: FreeCoordinate, z: FreeCoordinate) -> TexelPoint {
    point2(x.floor() as GridCoordinate, z.floor() as GridCoordinate)
}

/// The horizontal path of a ray through the grid, with index 0 being X and 1 being Z.
//---
// The walk proceeds in unit steps of the dominant (“major”) axis measured from the
// starting position, not from cell boundaries. Within each step at most one boundary
// of the other (“minor”) axis can be crossed, since the minor rate is no greater than
// the major rate; the only question is whether it is crossed before or after the major
// axis boundary that falls within the same step.
#[derive(Clone, Copy, Debug)]
struct GridWalk {
    /// Starting position in grid coordinates.
    start: [FreeCoordinate; 2],
    /// Direction of travel along each axis: -1, 0, or 1.
    step: [FreeCoordinate; 2],
    /// Grid cells traversed per unit of ray parameter, along each axis; nonnegative.
    rate: [FreeCoordinate; 2],
}

impl GridWalk {
    /// Distance (in cells, along one axis) from `position` to the next cell boundary in the
    /// direction of travel, given that the cell currently occupied is `cell`.
    fn remaining(&self, axis: usize, cell: GridCoordinate, position: FreeCoordinate) -> FreeCoordinate {
        let step = self.step[axis];
        if step == 0.0 {
            FreeCoordinate::INFINITY
        } else {
            let boundary = FreeCoordinate::from(cell) + if step > 0.0 { 1.0 } else { 0.0 };
            step * (boundary - position)
        }
    }

    /// Parameter at which the path leaves the rectangle of cells `0..size` on either axis.
    fn t_leaving(&self, size: Size2D<GridCoordinate, Texel>) -> FreeCoordinate {
        let extent = [FreeCoordinate::from(size.width), FreeCoordinate::from(size.height)];
        let mut t = FreeCoordinate::INFINITY;
        for axis in 0..2 {
            let step = self.step[axis];
            let distance = if step > 0.0 {
                extent[axis] - self.start[axis]
            } else if step < 0.0 {
                self.start[axis]
            } else {
                continue;
            };
            t = t.min(distance / self.rate[axis]);
        }
        t
    }

    /// Walks the path, returning the parameter, axis crossed, and cell of the first occupied
    /// cell entered before `t_exit`.
    ///
    /// The starting cell itself is not tested.
    fn first_occupied(
        &self,
        mask: &impl OccupancyMask,
        t_exit: FreeCoordinate,
    ) -> Option<(FreeCoordinate, usize, TexelPoint)> {
        let (major, minor) = if self.rate[0] > self.rate[1] {
            (0, 1)
        } else {
            (1, 0)
        };
        if self.rate[major] == 0.0 {
            // Vertical ray; there are no side faces to hit.
            return None;
        }
        let slope = self.rate[minor] / self.rate[major];
        let major_step = self.step[major] as GridCoordinate;
        let minor_step = self.step[minor] as GridCoordinate;

        let mut cell = [
            self.start[0].floor() as GridCoordinate,
            self.start[1].floor() as GridCoordinate,
        ];
        let to_point = |cell: [GridCoordinate; 2]| point2(cell[0], cell[1]);

        // The major axis distance to its next boundary, measured from the start of each
        // unit step, is the same at every step.
        let major_remaining = self.remaining(major, cell[major], self.start[major]);
        let minor_limit = major_remaining * slope;

        let mut i: GridCoordinate = 0;
        loop {
            let fi = FreeCoordinate::from(i);
            if !(fi / self.rate[major] < t_exit) {
                return None;
            }
            let minor_position = self.start[minor] + self.step[minor] * fi * slope;
            let minor_remaining = self.remaining(minor, cell[minor], minor_position);

            let t_major = (fi + major_remaining) / self.rate[major];
            let t_minor = fi / self.rate[major] + minor_remaining / self.rate[minor];

            // On an exact tie (passing through a cell corner) the minor axis goes first.
            let order: [Option<usize>; 2] = if minor_remaining <= minor_limit {
                [Some(minor), Some(major)]
            } else if minor_remaining <= slope {
                [Some(major), Some(minor)]
            } else {
                [Some(major), None]
            };
            for axis in order.into_iter().flatten() {
                let t = if axis == major {
                    cell[axis] += major_step;
                    t_major
                } else {
                    cell[axis] += minor_step;
                    t_minor
                };
                if mask.occupied(to_point(cell)) {
                    return (t <= t_exit).then_some((t, axis, to_point(cell)));
                }
            }

            i += 1;
        }
    }
}
