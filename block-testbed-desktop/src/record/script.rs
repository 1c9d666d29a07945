use std::fmt;
use std::str::FromStr;

use block_testbed_base::math::FreeCoordinate;
use block_testbed_render::{RenderControl, RenderMode};

// -------------------------------------------------------------------------------------------------

/// One scripted input event, standing in for what an interactive user would do.
///
/// The text form is `name=value`, or just `refresh`:
///
/// * `pan=DX,DY` drags the view by the given number of pixels.
/// * `zoom=S` zooms in by `S` steps (negative to zoom out).
/// * `mode=NAME` selects a [`RenderMode`].
/// * `material=ID` and `data=N` set the material id and data value.
/// * `compass=on` or `compass=off` shows or hides the compass.
/// * `refresh` redraws without changing anything.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Step {
    #[allow(missing_docs)]
    Pan {
        dx: FreeCoordinate,
        dy: FreeCoordinate,
    },
    #[allow(missing_docs)]
    Zoom(FreeCoordinate),
    #[allow(missing_docs)]
    Mode(RenderMode),
    #[allow(missing_docs)]
    Material(u32),
    #[allow(missing_docs)]
    Data(u32),
    #[allow(missing_docs)]
    Compass(bool),
    #[allow(missing_docs)]
    Refresh,
}

/// Error from parsing a [`Step`].
#[derive(Clone, Debug, Eq, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum StepError {
    /// unknown step {0:?}; expected one of pan, zoom, mode, material, data, compass, refresh
    UnknownStep(String),
    /// step {0:?} requires a value
    MissingValue(&'static str),
    /// step {0:?} does not take a value
    UnexpectedValue(&'static str),
    /// invalid value {value:?} for step {name:?}
    InvalidValue {
        /// Name of the step.
        name: &'static str,
        /// The value as written.
        value: String,
    },
}

impl std::error::Error for StepError {}

impl Step {
    /// Performs this step using `control`.
    ///
    /// Returns whether a new frame will be drawn as a result.
    pub fn apply(self, control: &RenderControl) -> bool {
        match self {
            Step::Pan { dx, dy } => control.pan(dx, dy),
            Step::Zoom(scale) => control.move_forward(scale),
            Step::Mode(mode) => control.set_mode(mode),
            Step::Material(id) => control.set_material_id(id),
            Step::Data(data) => control.set_material_data(data),
            Step::Compass(compass) => control.set_compass(compass),
            Step::Refresh => {
                control.refresh();
                true
            }
        }
    }
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (s, None),
        };
        match name {
            "pan" => {
                let value = require("pan", value)?;
                value
                    .split_once(',')
                    .and_then(|(dx, dy)| {
                        Some(Step::Pan {
                            dx: finite(dx)?,
                            dy: finite(dy)?,
                        })
                    })
                    .ok_or_else(|| invalid("pan", value))
            }
            "zoom" => {
                let value = require("zoom", value)?;
                finite(value)
                    .map(Step::Zoom)
                    .ok_or_else(|| invalid("zoom", value))
            }
            "mode" => {
                let value = require("mode", value)?;
                value.parse().map(Step::Mode).map_err(|_| invalid("mode", value))
            }
            "material" => {
                let value = require("material", value)?;
                value
                    .parse()
                    .map(Step::Material)
                    .map_err(|_| invalid("material", value))
            }
            "data" => {
                let value = require("data", value)?;
                value.parse().map(Step::Data).map_err(|_| invalid("data", value))
            }
            "compass" => match require("compass", value)? {
                "on" | "true" => Ok(Step::Compass(true)),
                "off" | "false" => Ok(Step::Compass(false)),
                other => Err(invalid("compass", other)),
            },
            "refresh" => match value {
                None => Ok(Step::Refresh),
                Some(_) => Err(StepError::UnexpectedValue("refresh")),
            },
            other => Err(StepError::UnknownStep(other.to_owned())),
        }
    }
}

fn require<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str, StepError> {
    value.ok_or(StepError::MissingValue(name))
}

fn invalid(name: &'static str, value: &str) -> StepError {
    StepError::InvalidValue {
        name,
        value: value.to_owned(),
    }
}

fn finite(s: &str) -> Option<FreeCoordinate> {
    s.trim()
        .parse::<FreeCoordinate>()
        .ok()
        .filter(|v| v.is_finite())
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Pan { dx, dy } => write!(f, "pan={dx},{dy}"),
            Step::Zoom(scale) => write!(f, "zoom={scale}"),
            Step::Mode(mode) => write!(f, "mode={mode}"),
            Step::Material(id) => write!(f, "material={id}"),
            Step::Data(data) => write!(f, "data={data}"),
            Step::Compass(true) => write!(f, "compass=on"),
            Step::Compass(false) => write!(f, "compass=off"),
            Step::Refresh => write!(f, "refresh"),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Parses each of `steps`, skipping (with a warning) any that are malformed.
pub fn parse_steps<'a>(steps: impl IntoIterator<Item = &'a str>) -> Vec<Step> {
    steps
        .into_iter()
        .filter_map(|text| match text.parse::<Step>() {
            Ok(step) => Some(step),
            Err(e) => {
                log::warn!("skipping script step: {e}");
                None
            }
        })
        .collect()
}

/// Parses a script file's contents: one step per line, ignoring blank lines and lines
/// starting with `#`. Malformed steps are skipped with a warning.
pub fn parse_script(text: &str) -> Vec<Step> {
    parse_steps(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#')),
    )
}
