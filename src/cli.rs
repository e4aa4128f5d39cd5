use crate::config::{Config, ConfigError, DEFAULT_SIZE_SENTINEL};
use crate::plugin::{PLUGIN_NAME, TITLE};

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Two-letter single-dash flags and the long flags they stand for.
const MULTI_CHAR_SHORT_FLAGS: [(&str, &str); 3] = [
    ("-rx", "--rotatex"),
    ("-ry", "--rotatey"),
    ("-rz", "--rotatez"),
];

const PLUGIN_FLAGS: [&str; 4] = ["json", "man", "meta", "savejson"];

#[derive(Debug, Parser)]
#[command(name = PLUGIN_NAME, version, about = TITLE, long_about = None)]
pub struct Cli {
    /// Directory containing the input volumes
    #[arg(value_name = "inputDir", required_unless_present_any = PLUGIN_FLAGS)]
    pub input_dir: Option<PathBuf>,

    /// Directory the images are written to
    #[arg(value_name = "outputDir", required_unless_present_any = PLUGIN_FLAGS)]
    pub output_dir: Option<PathBuf>,

    /// Number of slices on the x axis
    #[arg(short = 'x', long, default_value_t = 5, allow_negative_numbers = true)]
    pub xslices: i64,

    /// Number of slices on the y axis
    #[arg(short = 'y', long, default_value_t = 5, allow_negative_numbers = true)]
    pub yslices: i64,

    /// Number of slices on the z axis
    #[arg(short = 'z', long, default_value_t = 5, allow_negative_numbers = true)]
    pub zslices: i64,

    /// Rotate how many degrees on the x axis (positive for counter-clockwise), also -rx
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub rotatex: i32,

    /// Rotate how many degrees on the y axis (positive for counter-clockwise), also -ry
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub rotatey: i32,

    /// Rotate how many degrees on the z axis (positive for counter-clockwise), also -rz
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub rotatez: i32,

    /// The pixel size of image, like 640,480 for 640 * 480
    #[arg(short = 's', long, default_value = DEFAULT_SIZE_SENTINEL)]
    pub size: String,

    /// Print the JSON representation of the plugin and exit
    #[arg(long)]
    pub json: bool,

    /// Print the man page and exit
    #[arg(long)]
    pub man: bool,

    /// Print plugin metadata and exit
    #[arg(long)]
    pub meta: bool,

    /// Save the JSON representation of the plugin to DIR and exit
    #[arg(long, value_name = "DIR")]
    pub savejson: Option<PathBuf>,

    /// Verbosity level (0-2)
    #[arg(short = 'v', long, default_value_t = 0)]
    pub verbosity: u8,
}

impl Cli {
    /// Parse `args` (program name first), accepting `-rx`/`-ry`/`-rz`.
    pub fn parse_normalized<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Whether one of the informational plugin flags was given.
    pub fn is_info_request(&self) -> bool {
        self.json || self.man || self.meta || self.savejson.is_some()
    }

    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Validate the arguments into a run configuration.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let input_dir = self
            .input_dir
            .clone()
            .ok_or(ConfigError::MissingDirectory("inputDir"))?;
        let output_dir = self
            .output_dir
            .clone()
            .ok_or(ConfigError::MissingDirectory("outputDir"))?;
        Config::new(
            input_dir,
            output_dir,
            [self.xslices, self.yslices, self.zslices],
            [self.rotatex, self.rotatey, self.rotatez],
            &self.size,
        )
    }
}

/// Rewrite `-rx 10` / `-rx=10` style arguments to their long form.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (short, long) in MULTI_CHAR_SHORT_FLAGS {
                if text == short {
                    return OsString::from(long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|v| v.strip_prefix('=')) {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}
