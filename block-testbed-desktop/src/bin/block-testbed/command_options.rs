//! Command line option parsing.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use strum::IntoEnumIterator;

use block_testbed_desktop::logging::LoggingArgs;
use block_testbed_desktop::{Settings, SettingsArgs};
use block_testbed_render::RenderMode;

#[derive(Clone, Debug, Parser)]
#[command(
    name = crate::TITLE, author, about, version,
    help_template = "\
{name} {version}
{author}
{about-with-newline}
{usage-heading}
    {usage}

{all-args}{after-help}",
)]
pub(crate) struct TestbedArgs {
    /// Image size, in pixels.
    #[arg(long = "size", value_name = "W×H")]
    pub(crate) size: Option<SizeArg>,

    /// What to draw: “solid-voxel” (or “block”), “sprite”, or “fixed-test-geometry”
    /// (or “custom”).
    #[arg(long = "mode", short = 'm', value_name = "MODE", value_parser = parse_mode)]
    pub(crate) mode: Option<RenderMode>,

    /// Material (block) id to draw.
    #[arg(long = "material", value_name = "ID")]
    pub(crate) material: Option<u32>,

    /// Auxiliary data value of the material; also selects the facing of the fixed test
    /// geometry.
    #[arg(long = "data", value_name = "N")]
    pub(crate) data: Option<u32>,

    /// Draw direction labels on the walls of the voxel.
    #[arg(long = "compass")]
    pub(crate) compass: bool,

    /// Directory to write each frame into, as “frame-NNNN.png”.
    ///
    /// If absent, frames are drawn and reported but not saved.
    #[arg(long = "output", short = 'o', value_name = "DIR")]
    pub(crate) output_dir: Option<PathBuf>,

    /// A scripted input step, performed after the first frame and after any --script
    /// file. May be repeated.
    ///
    /// Steps are “pan=DX,DY”, “zoom=S”, “mode=NAME”, “material=ID”, “data=N”,
    /// “compass=on|off”, and “refresh”.
    #[arg(long = "step", value_name = "STEP")]
    pub(crate) steps: Vec<String>,

    /// File of scripted input steps, one per line.
    #[arg(long = "script", value_name = "FILE")]
    pub(crate) script: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,

    #[command(flatten)]
    pub(crate) settings: SettingsArgs,
}

impl TestbedArgs {
    /// Applies the options which override individual [`Settings`].
    pub(crate) fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(SizeArg(size)) = self.size {
            settings.size = size;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(material) = self.material {
            settings.material = material;
        }
        if let Some(data) = self.data {
            settings.data = data;
        }
        if self.compass {
            settings.compass = true;
        }
    }
}

fn parse_mode(s: &str) -> Result<RenderMode, String> {
    RenderMode::from_str(s).map_err(|_| {
        let names: Vec<&'static str> = RenderMode::iter().map(<&str>::from).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

/// Image size, parseable in a variety of formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SizeArg(pub [u32; 2]);

impl FromStr for SizeArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dims: [u32; 2] = s
            .split(&['×', 'x', ',', ';', ' '][..])
            .map(|s| match s.parse::<u32>() {
                Ok(i) if i > 0 => Ok(i),
                _ => Err(format!("{s:?} not a positive integer")),
            })
            .collect::<Result<Vec<u32>, String>>()?
            .try_into()
            .map_err(|_| String::from("must be two integers"))?;
        Ok(SizeArg(dims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> clap::error::Result<TestbedArgs> {
        TestbedArgs::try_parse_from(std::iter::once("block-testbed").chain(args.iter().copied()))
    }

    fn settings_for(args: &[&str]) -> Settings {
        let args = parse(args).unwrap();
        let mut settings = args.settings.clone().build_settings().unwrap();
        args.apply_overrides(&mut settings);
        settings
    }

    #[test]
    fn defaults() {
        assert_eq!(settings_for(&[]), Settings::default());
    }

    #[test]
    fn overrides() {
        let settings = settings_for(&[
            "--size=64x48",
            "--mode=custom",
            "--material=17",
            "--data=4",
            "--compass",
        ]);
        assert_eq!(settings.size, [64, 48]);
        assert_eq!(settings.mode, RenderMode::FixedTestGeometry);
        assert_eq!((settings.material, settings.data), (17, 4));
        assert!(settings.compass);
    }

    #[test]
    fn options_override_set() {
        let settings = settings_for(&["-S", r#"mode="sprite""#, "-S", "data=1", "--data=2"]);
        assert_eq!(settings.mode, RenderMode::Sprite);
        assert_eq!(settings.data, 2);
    }

    #[test]
    fn size_formats() {
        assert_eq!("10×20".parse(), Ok(SizeArg([10, 20])));
        assert_eq!("10,20".parse(), Ok(SizeArg([10, 20])));
        assert_eq!(
            "10x0".parse::<SizeArg>(),
            Err(String::from("\"0\" not a positive integer"))
        );
        assert_eq!(
            "10".parse::<SizeArg>(),
            Err(String::from("must be two integers"))
        );
    }

    #[test]
    fn invalid_mode() {
        let e = parse(&["--mode", "wireframe"]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ValueValidation);
        assert!(
            e.to_string()
                .contains("expected one of: solid-voxel, sprite, fixed-test-geometry"),
            "{e}"
        );
    }

    #[test]
    fn steps_are_collected_in_order() {
        let args = parse(&["--step", "mode=sprite", "--step=refresh"]).unwrap();
        assert_eq!(args.steps, vec!["mode=sprite", "refresh"]);
    }
}
