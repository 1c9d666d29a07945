use block_testbed_base::math::{FreeCoordinate, FreeVector, Rgba};
use block_testbed_base::raycast::Ray;

/// Identifies the block whose appearance is being inspected: a numeric block id and an
/// auxiliary data value (orientation, variant, etc.) whose meaning depends on the id.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    /// Block id.
    pub id: u32,
    /// Auxiliary data value.
    pub data: u32,
}

impl Material {
    #[allow(missing_docs)]
    pub const fn new(id: u32, data: u32) -> Self {
        Self { id, data }
    }
}

/// What a [`Trace`](crate::Trace) is passing through, before or after a surface.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum MaterialTag {
    /// Empty space.
    #[default]
    Air,
    /// The solid material that sprites are treated as being made of.
    SpriteSolid,
    /// The material being inspected.
    Block(Material),
}

/// A surface found by a [`MaterialResolver`].
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the ray, in units of the ray's direction vector.
    pub t: FreeCoordinate,
    /// Unit normal of the surface at the hit point.
    pub normal: FreeVector,
    /// Color of the surface at the hit point.
    pub color: Rgba,
}

/// Computes how a material looks when it fills the unit voxel.
///
/// This is the boundary between the renderer and whatever block appearance system is being
/// inspected; the renderer only supplies rays and uses the returned hit.
pub trait MaterialResolver: Send + Sync {
    /// Intersects `ray`, whose origin is where it entered the voxel (or the camera, if the
    /// camera is inside), with `material`.
    ///
    /// Returns the nearest surface strictly closer than `t_limit`, or [`None`] if the ray
    /// passes through without hitting anything.
    fn intersect(
        &self,
        ray: &Ray,
        material: Material,
        t_limit: FreeCoordinate,
    ) -> Option<SurfaceHit>;
}

impl<T: MaterialResolver + ?Sized> MaterialResolver for std::sync::Arc<T> {
    fn intersect(
        &self,
        ray: &Ray,
        material: Material,
        t_limit: FreeCoordinate,
    ) -> Option<SurfaceHit> {
        (**self).intersect(ray, material, t_limit)
    }
}
