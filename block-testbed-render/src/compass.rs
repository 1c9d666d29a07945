use std::sync::Arc;

use block_testbed_base::math::{FreePoint, Quad, UvRange};

use crate::{TextureSampler, Trace};

/// Direction labels drawn on the inside of the voxel's four side walls, so that the
/// orientation of the view can be read off the image.
///
/// Each wall faces the interior of the voxel and is therefore seen through the voxel,
/// behind whatever the block itself draws.
#[derive(Clone)]
pub struct Compass {
    walls: [(Quad, Arc<dyn TextureSampler>); 4],
}

impl Compass {
    /// Creates a compass from the label textures for the east (+X), west (−X), north (−Z),
    /// and south (+Z) walls.
    pub fn new(
        east: Arc<dyn TextureSampler>,
        west: Arc<dyn TextureSampler>,
        north: Arc<dyn TextureSampler>,
        south: Arc<dyn TextureSampler>,
    ) -> Self {
        let [east_quad, west_quad, north_quad, south_quad] = Self::quads();
        Self {
            walls: [
                (east_quad, east),
                (west_quad, west),
                (north_quad, north),
                (south_quad, south),
            ],
        }
    }

    /// The wall quads, in the order east, west, north, south.
    pub fn quads() -> [Quad; 4] {
        let p = FreePoint::new;
        [
            Quad::new(p(1., 0., 0.), p(1., 0., 1.), p(1., 1., 0.), UvRange::FULL),
            Quad::new(p(0., 0., 1.), p(0., 0., 0.), p(0., 1., 1.), UvRange::FULL),
            Quad::new(p(0., 0., 0.), p(1., 0., 0.), p(0., 1., 0.), UvRange::FULL),
            Quad::new(p(1., 0., 1.), p(0., 0., 1.), p(1., 1., 1.), UvRange::FULL),
        ]
    }

    /// Draws the compass into `trace`, which should already be positioned in the voxel.
    ///
    /// Any previous hit is discarded; the nearest wall hit, if any, becomes the trace's hit,
    /// to be overridden by anything nearer found afterward.
    pub fn trace(&self, trace: &mut Trace) {
        trace.t = f64::INFINITY;
        for (quad, texture) in &self.walls {
            if let Some(hit) = quad.intersect(&trace.ray, trace.t) {
                trace.commit(hit.t, quad.normal(), texture.sample_uv(hit.uv));
            }
        }
    }
}

impl std::fmt::Debug for Compass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compass").finish_non_exhaustive()
    }
}
