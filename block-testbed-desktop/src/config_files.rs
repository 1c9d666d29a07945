use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use block_testbed_render::camera::{ImageSize, OrbitCamera};
use block_testbed_render::{Material, RenderMode, RenderParameters};

// -------------------------------------------------------------------------------------------------

/// Everything about a session that can be set from a configuration file.
///
/// Missing fields take their [default](Self::default) values.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct Settings {
    /// Image width and height, in pixels.
    pub size: [u32; 2],
    /// Initial camera pose.
    pub camera: OrbitCamera,
    /// Initial render mode.
    pub mode: RenderMode,
    /// Initial material id.
    pub material: u32,
    /// Initial material data value.
    pub data: u32,
    /// Whether the compass is initially drawn.
    pub compass: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: [400, 400],
            camera: OrbitCamera::default(),
            mode: RenderMode::SolidVoxel,
            material: crate::resolver::GRASS,
            data: 0,
            compass: false,
        }
    }
}

impl Settings {
    #[allow(missing_docs)]
    pub fn image_size(&self) -> ImageSize {
        ImageSize::from(self.size)
    }

    /// The parameters the first frame is drawn with.
    pub fn render_parameters(&self) -> RenderParameters {
        RenderParameters::new(
            self.camera,
            Material::new(self.material, self.data),
            self.mode,
            self.compass,
        )
    }

    /// Reads settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let file = File::open(path)
            .with_context(|| format!("failed to open settings file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }
}

// -------------------------------------------------------------------------------------------------

/// [`clap::Args`] argument group struct for args that affect what settings are used.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct SettingsArgs {
    /// JSON file to read settings from, instead of using the defaults.
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[expect(clippy::doc_markdown, reason = "will be displayed in --help")]
    /// Override the value of a setting for this session.
    ///
    /// The value is specified as a key-value pair where the key is an unquoted string, the
    /// separator is “=”, and the value is a JSON value (which, if a string, must be quoted);
    /// for example: -Smode='"sprite"'
    #[arg(long = "set", short = 'S', value_parser = parse_configure, value_name = "NAME=JSON")]
    pub set: Vec<(String, serde_json::Value)>,
}

impl SettingsArgs {
    /// Constructs the [`Settings`] a session with these args should use.
    pub fn build_settings(self) -> Result<Settings, anyhow::Error> {
        let Self {
            config_file,
            set: to_override,
        } = self;

        let settings = match config_file {
            Some(path) => Settings::from_file(&path)?,
            None => Settings::default(),
        };
        if to_override.is_empty() {
            return Ok(settings);
        }

        let Ok(serde_json::Value::Object(mut current_settings)) = serde_json::to_value(&settings)
        else {
            unreachable!("settings should appear as a json object");
        };
        for (key, value) in to_override {
            current_settings.insert(key, value);
        }
        serde_json::from_value(serde_json::Value::Object(current_settings))
            .context("--set did not produce valid settings")
    }
}

fn parse_configure(arg: &str) -> Result<(String, serde_json::Value), anyhow::Error> {
    let (key, value) = arg.split_once('=').ok_or_else(|| anyhow::anyhow!("missing '='"))?;
    let value = serde_json::from_str(value)?;
    Ok((key.to_owned(), value))
}

// -------------------------------------------------------------------------------------------------
