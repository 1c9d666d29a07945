use std::sync::Arc;

use block_testbed_base::math::{Face6, FreePoint, Quad, UvRange};

use crate::{TextureSampler, Trace};

/// Fixed geometry for checking texture orientation: a full cube drawn with a distinct
/// "front" texture on one face, "back" on the opposite face, and "side" on the other four,
/// rotated to face any of the six directions.
///
/// This mimics a directional block (like a piston or command block) without depending on
/// any block model system.
#[derive(Clone)]
pub struct TestModel {
    /// For each facing, in [`Self::FACINGS`] order, the six quads in the order
    /// north, south, west, east, front, back.
    faces: [[Quad; 6]; 6],
    /// Textures for each quad index.
    textures: [Arc<dyn TextureSampler>; 6],
}

impl TestModel {
    /// The facing for each value of `data % 6`.
    pub const FACINGS: [Face6; 6] = [
        Face6::NY,
        Face6::PY,
        Face6::NZ,
        Face6::PZ,
        Face6::NX,
        Face6::PX,
    ];

    /// Creates the model from its three textures.
    pub fn new(
        side: Arc<dyn TextureSampler>,
        front: Arc<dyn TextureSampler>,
        back: Arc<dyn TextureSampler>,
    ) -> Self {
        let up = Self::upward_quads();
        let south = up.map(|q| q.rotate_x());
        let down = south.map(|q| q.rotate_x());
        let north = down.map(|q| q.rotate_x());
        let west = up.map(|q| q.rotate_z());
        let east = down.map(|q| q.rotate_z());
        Self {
            faces: [down, up, north, south, west, east],
            textures: [
                side.clone(),
                side.clone(),
                side.clone(),
                side,
                front,
                back,
            ],
        }
    }

    /// The quads of the cube with its front facing up, in the order
    /// north, south, west, east, top (front), bottom (back).
    fn upward_quads() -> [Quad; 6] {
        let p = FreePoint::new;
        [
            Quad::new(p(1., 0., 0.), p(0., 0., 0.), p(1., 1., 0.), UvRange::new(1., 0., 0., 1.)),
            Quad::new(p(0., 0., 1.), p(1., 0., 1.), p(0., 1., 1.), UvRange::new(0., 1., 0., 1.)),
            Quad::new(p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 0.), UvRange::new(0., 1., 0., 1.)),
            Quad::new(p(1., 0., 1.), p(1., 0., 0.), p(1., 1., 1.), UvRange::new(1., 0., 0., 1.)),
            Quad::new(p(1., 1., 0.), p(0., 1., 0.), p(1., 1., 1.), UvRange::new(1., 0., 0., 1.)),
            Quad::new(p(0., 0., 0.), p(1., 0., 0.), p(0., 0., 1.), UvRange::new(0., 1., 0., 1.)),
        ]
    }

    /// Returns which way the front faces for the given auxiliary data value.
    pub fn facing(data: u32) -> Face6 {
        Self::FACINGS[(data % 6) as usize]
    }

    /// Returns the quads drawn for the given auxiliary data value, in the order
    /// north, south, west, east, front, back (as named before rotation).
    pub fn quads(&self, data: u32) -> &[Quad; 6] {
        &self.faces[(data % 6) as usize]
    }

    /// Intersects `trace` with the model oriented according to `data`.
    ///
    /// Every quad nearer than the trace's current hit replaces it. If any quad was hit, the
    /// result is made opaque and the trace advances to it.
    ///
    /// Returns whether any quad was hit.
    pub fn trace(&self, trace: &mut Trace, data: u32) -> bool {
        let mut hit_any = false;
        for (quad, texture) in self.quads(data).iter().zip(&self.textures) {
            if let Some(hit) = quad.intersect(&trace.ray, trace.t) {
                hit_any |= trace.commit(hit.t, quad.normal(), texture.sample_uv(hit.uv));
            }
        }
        if hit_any {
            trace.color = trace.color.with_alpha(1.0);
            trace.advance_to_hit();
        }
        hit_any
    }
}

impl std::fmt::Debug for TestModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestModel").finish_non_exhaustive()
    }
}
