use crate::enums::Axis;
use crate::sampling::SliceSpec;

use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};
use thiserror::Error;

/// Pixels per inch of the rendered figure.
pub const DEFAULT_DPI: u32 = 100;

/// Largest accepted canvas width or height in pixels.
pub const MAX_CANVAS_SIDE: u32 = 8_192;

/// `--size` value meaning "use the default canvas".
pub const DEFAULT_SIZE_SENTINEL: &str = "NA";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid slice count {count} for the {axis} axis, expected at least 1")]
    InvalidSliceCount { axis: Axis, count: i64 },

    #[error("Missing required {0} argument")]
    MissingDirectory(&'static str),

    #[error(
        "Malformed size \"{0}\", expected WIDTH,HEIGHT in pixels (1 to 8192 each) or \"NA\""
    )]
    MalformedSize(String),
}

/// Pixel size of the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    /// A 6.4 x 4.8 inch figure.
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl CanvasSize {
    /// Figure size in inches at [`DEFAULT_DPI`].
    pub fn inches(&self) -> (f64, f64) {
        (
            self.width as f64 / DEFAULT_DPI as f64,
            self.height as f64 / DEFAULT_DPI as f64,
        )
    }
}

impl FromStr for CanvasSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEFAULT_SIZE_SENTINEL {
            return Ok(Self::default());
        }

        let malformed = || ConfigError::MalformedSize(s.to_owned());
        let (width, height) = s.split_once(',').ok_or_else(malformed)?;
        let width: u32 = width.trim().parse().map_err(|_| malformed())?;
        let height: u32 = height.trim().parse().map_err(|_| malformed())?;
        let side = 1..=MAX_CANVAS_SIDE;
        if !side.contains(&width) || !side.contains(&height) {
            return Err(malformed());
        }
        Ok(Self { width, height })
    }
}

/// Everything a run needs, validated before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// One spec per axis, in x, y, z order.
    pub slices: [SliceSpec; 3],
    pub canvas: CanvasSize,
}

impl Config {
    /// Validate raw per-axis counts and rotations (x, y, z order) and the
    /// `--size` string.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        counts: [i64; 3],
        rotations: [i32; 3],
        size: &str,
    ) -> Result<Self, ConfigError> {
        let spec = |axis: Axis| -> Result<SliceSpec, ConfigError> {
            let count = counts[axis.index()];
            let invalid = ConfigError::InvalidSliceCount { axis, count };
            let count = usize::try_from(count)
                .ok()
                .and_then(NonZeroUsize::new)
                .ok_or(invalid)?;
            Ok(SliceSpec::new(axis, count, rotations[axis.index()]))
        };

        Ok(Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            slices: [spec(Axis::X)?, spec(Axis::Y)?, spec(Axis::Z)?],
            canvas: size.parse()?,
        })
    }
}
