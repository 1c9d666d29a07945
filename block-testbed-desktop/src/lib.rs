//! Components of the `block-testbed` application, which renders a single voxel with
//! [`block_testbed_render`] and saves the frames.
//!
//! There is no window; interactive input is replaced by a script of [`record::Step`]s, and
//! the display by PNG files. It exists as a library so that its pieces can be tested
//! separately from the binary.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

mod config_files;
pub use config_files::{Settings, SettingsArgs};
pub mod logging;
pub mod record;
pub mod resolver;
pub mod textures;
