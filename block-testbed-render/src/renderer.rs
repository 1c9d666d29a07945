use std::sync::Arc;

use block_testbed_base::raycast::{Ray, SpriteGeometry};
use euclid::point2;

use crate::camera::{ImagePoint, ImageSize, OrbitCamera};
use crate::{
    AlphaMask, Compass, FrameBuffer, Material, MaterialResolver, MaterialTag, TestModel,
    TextureSampler, Trace,
};

/// What is drawn in the voxel.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RenderMode {
    /// The selected [`Material`], as computed by the [`MaterialResolver`].
    #[default]
    #[strum(to_string = "solid-voxel", serialize = "block")]
    #[cfg_attr(feature = "serde", serde(rename = "solid-voxel", alias = "block"))]
    SolidVoxel,

    /// The sprite texture, as a one-texel-thick horizontal slab.
    #[strum(to_string = "sprite")]
    #[cfg_attr(feature = "serde", serde(rename = "sprite"))]
    Sprite,

    /// The [`TestModel`] cube, oriented by the selected material's data value.
    #[strum(to_string = "fixed-test-geometry", serialize = "custom")]
    #[cfg_attr(feature = "serde", serde(rename = "fixed-test-geometry", alias = "custom"))]
    FixedTestGeometry,
}

/// Everything that determines the content of a frame, other than the [`Scene`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct RenderParameters {
    /// Viewpoint.
    pub camera: OrbitCamera,
    /// Material drawn in [`RenderMode::SolidVoxel`] and whose data value orients
    /// [`RenderMode::FixedTestGeometry`].
    pub material: Material,
    /// What to draw.
    pub mode: RenderMode,
    /// Whether to draw the [`Compass`].
    pub compass: bool,
}

impl RenderParameters {
    #[allow(missing_docs)]
    pub fn new(camera: OrbitCamera, material: Material, mode: RenderMode, compass: bool) -> Self {
        Self {
            camera,
            material,
            mode,
            compass,
        }
    }
}

/// The collaborators that supply appearance to the [`Renderer`].
#[derive(Clone)]
#[non_exhaustive]
pub struct Scene {
    /// Computes the appearance of materials in [`RenderMode::SolidVoxel`].
    pub resolver: Arc<dyn MaterialResolver>,
    /// Texture drawn in [`RenderMode::Sprite`]; its transparent texels are empty.
    pub sprite: Arc<dyn TextureSampler>,
    /// Direction labels.
    pub compass: Compass,
    /// Geometry for [`RenderMode::FixedTestGeometry`].
    pub test_model: TestModel,
}

impl Scene {
    #[allow(missing_docs)]
    pub fn new(
        resolver: Arc<dyn MaterialResolver>,
        sprite: Arc<dyn TextureSampler>,
        compass: Compass,
        test_model: TestModel,
    ) -> Self {
        Self {
            resolver,
            sprite,
            compass,
            test_model,
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene").finish_non_exhaustive()
    }
}

/// Ray tracer for the single voxel.
///
/// Stateless apart from its [`Scene`]; all per-frame inputs are in [`RenderParameters`].
#[derive(Clone, Debug)]
pub struct Renderer {
    scene: Scene,
}

impl Renderer {
    #[allow(missing_docs)]
    pub fn new(scene: Scene) -> Self {
        Self { scene }
    }

    #[allow(missing_docs)]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Draws a complete frame into `frame`, marking it with `frame_number`.
    pub fn draw_frame(&self, parameters: &RenderParameters, frame: &mut FrameBuffer, frame_number: u64) {
        let size = frame.size();
        for y in 0..size.height {
            for x in 0..size.width {
                let pixel = point2(x, y);
                frame.set(pixel, self.trace_pixel(parameters, pixel, size).to_rgb8());
            }
        }
        frame.set_frame_number(frame_number);
    }

    /// Traces the ray for one pixel of an image of the given size.
    ///
    /// [`Self::draw_frame()`] is equivalent to calling this for every pixel and tone mapping
    /// the results.
    pub fn trace_pixel(
        &self,
        parameters: &RenderParameters,
        pixel: ImagePoint,
        size: ImageSize,
    ) -> Trace {
        self.trace_ray(parameters, parameters.camera.ray(pixel, size))
    }

    /// Traces `ray`, which should start at the camera, through the voxel.
    pub fn trace_ray(&self, parameters: &RenderParameters, ray: Ray) -> Trace {
        let mut trace = Trace::new(ray);
        if !trace.enter_voxel() {
            return trace;
        }
        if parameters.compass {
            self.scene.compass.trace(&mut trace);
        }
        let material = parameters.material;
        match parameters.mode {
            RenderMode::SolidVoxel => {
                trace.transition(MaterialTag::Air, MaterialTag::Block(material));
                if let Some(hit) = self.scene.resolver.intersect(&trace.ray, material, trace.t) {
                    if trace.commit(hit.t, hit.normal, hit.color) {
                        trace.advance_to_hit();
                    }
                }
            }
            RenderMode::Sprite => {
                // The sprite's edge cells extend past the voxel's walls, so it is intersected
                // from the camera rather than from the entry point.
                let sprite = &*self.scene.sprite;
                let t_limit = trace.t + trace.distance;
                if let Some(hit) =
                    SpriteGeometry::STANDARD.intersect(&ray, t_limit, &AlphaMask(sprite))
                {
                    let Some(color) = sprite.get(hit.cell) else {
                        panic!("sprite hit {hit:?} is outside of the sprite texture");
                    };
                    if trace.commit(hit.t - trace.distance, hit.face.normal_vector(), color) {
                        trace.advance_to_hit();
                        trace.transition(MaterialTag::Air, MaterialTag::SpriteSolid);
                    }
                }
            }
            RenderMode::FixedTestGeometry => {
                trace.transition(MaterialTag::Air, MaterialTag::Block(material));
                self.scene.test_model.trace(&mut trace, material.data);
            }
        }
        trace
    }
}
