//! Single-voxel ray tracer for inspecting how a block's appearance is computed,
//! and the background thread which keeps a rendered image up to date as the view
//! parameters change.
//!
//! The pieces, from the bottom up:
//!
//! * [`camera::OrbitCamera`] produces a ray for each pixel.
//! * [`Trace`] carries the per-pixel state of following one ray.
//! * [`Renderer`] dispatches each ray to the active [`RenderMode`] and tone maps the result
//!   into a [`FrameBuffer`].
//! * [`RenderThread`] owns a [`Renderer`], applies parameter changes made through a
//!   [`RenderControl`] once per frame, and publishes finished frames to a [`DisplaySink`].
//!
//! Materials and textures are not defined here; they are supplied through the
//! [`MaterialResolver`] and [`TextureSampler`] traits.
//!
//! ## Package features
//!
//! * `"serde"`: Adds serialization for [`RenderMode`], [`Material`], and
//!   [`RenderParameters`].

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

// -------------------------------------------------------------------------------------------------

pub mod camera;

mod compass;
pub use compass::Compass;

mod frame;
pub use frame::{FrameBuffer, FrameInfo, Surface};

mod material;
pub use material::{Material, MaterialResolver, MaterialTag, SurfaceHit};

mod renderer;
pub use renderer::{RenderMode, RenderParameters, Renderer, Scene};

mod test_model;
pub use test_model::TestModel;

mod texture;
pub use texture::{AlphaMask, Texture, TextureSampler};

mod thread;
pub use thread::{DisplaySink, RenderControl, RenderThread};

mod trace;
pub use trace::{Trace, tone_map};

// -------------------------------------------------------------------------------------------------

/// An error indicating that a [`RenderThread`] or [`FrameBuffer`] could not be set up,
/// or that rendering was aborted.
#[derive(Debug, displaydoc::Display)]
#[non_exhaustive]
pub enum RenderError {
    /// image size {width}×{height} has no pixels
    EmptyImage {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// failed to start render thread
    ThreadSpawn(std::io::Error),

    /// render thread panicked
    Panicked,
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::EmptyImage { .. } => None,
            RenderError::ThreadSpawn(e) => Some(e),
            RenderError::Panicked => None,
        }
    }
}
