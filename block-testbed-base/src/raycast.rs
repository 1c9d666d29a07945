//! Ray representation and the two intersection algorithms the renderer is built on:
//! entering the unit voxel ([`unit_cube_interval()`]) and walking a sprite's texel grid
//! ([`SpriteGeometry::intersect()`]).

// -------------------------------------------------------------------------------------------------

mod ray;
pub use ray::Ray;

mod slab;
pub use slab::{Interval, unit_cube_interval};

mod sprite;
pub use sprite::{OccupancyMask, SpriteGeometry, SpriteHit};

#[cfg(test)]
mod tests;
