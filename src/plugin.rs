//! Descriptive data of the pipeline plugin: what `--man`, `--meta`,
//! `--json` and `--savejson` report.

use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const PLUGIN_NAME: &str = "nifti_slice_grid";
pub const TITLE: &str = "Render evenly spaced NIfTI slices into an annotated grid image";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const BANNER: &str = r"
        _  __ _   _          _ _                      _     _
  _ __ (_)/ _| |_(_)    ___| (_) ___ ___    __ _ _ __(_) __| |
 | '_ \| | |_| __| |   / __| | |/ __/ _ \  / _` | '__| |/ _` |
 | | | | |  _| |_| |   \__ \ | | (_|  __/ | (_| | |  | | (_| |
 |_| |_|_|_|  \__|_|___|___/_|_|\___\___|__\__, |_|  |_|\__,_|
                  |_____|             |_____|___/
";

const SYNOPSIS: &str = r"
    NAME

        nifti_slice_grid

    SYNOPSIS

        nifti_slice_grid                                                \
            [-h] [--help]                                               \
            [--json]                                                    \
            [--man]                                                     \
            [--meta]                                                    \
            [--savejson <DIR>]                                          \
            [-v <level>] [--verbosity <level>]                          \
            [--version]                                                 \
            [-x <xslices>] [--xslices <xslices>]                        \
            [-y <yslices>] [--yslices <yslices>]                        \
            [-z <zslices>] [--zslices <zslices>]                        \
            [-rx <degrees>] [--rotatex <degrees>]                       \
            [-ry <degrees>] [--rotatey <degrees>]                       \
            [-rz <degrees>] [--rotatez <degrees>]                       \
            [-s <WIDTH,HEIGHT>] [--size <WIDTH,HEIGHT>]                 \
            <inputDir>                                                  \
            <outputDir>

    BRIEF EXAMPLE

        nifti_slice_grid -x 3 -y 3 -z 3 -rx 90 --size 1280,960 /incoming /outgoing

    DESCRIPTION

        For every `.nii` / `.nii.gz` volume in <inputDir>, picks evenly spaced
        slices along the x, y and z axes (never the outermost ones), rotates
        them and writes a single PNG named after the volume to <outputDir>.
        Row one holds the x slices, row two the y slices and row three the
        z slices. Each slice is captioned `index/extent ∠rotation°`.

    ARGS

        [-x <xslices>] [--xslices <xslices>]
        Number of slices on the x axis. Default 5.

        [-y <yslices>] [--yslices <yslices>]
        Number of slices on the y axis. Default 5.

        [-z <zslices>] [--zslices <zslices>]
        Number of slices on the z axis. Default 5.

        [-rx <degrees>] [--rotatex <degrees>]
        Rotate the x slices by this many degrees, positive for
        counter-clockwise. Default 0. Likewise -ry and -rz.

        [-s <WIDTH,HEIGHT>] [--size <WIDTH,HEIGHT>]
        Pixel size of the image, like 640,480. Default NA (640,480).

        [--json]
        If specified, show json representation of app and exit.

        [--man]
        If specified, print (this) man page and exit.

        [--meta]
        If specified, print plugin meta data and exit.

        [--savejson <DIR>]
        If specified, save json representation file to DIR and exit.

        [-v <level>] [--verbosity <level>]
        Verbosity level for app, 0 to 2.

        [--version]
        If specified, print version number and exit.
";

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Static description of the plugin and its resource needs.
#[derive(Debug, Clone, Serialize)]
pub struct PluginMeta {
    pub name: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub icon: &'static str,
    pub authors: &'static str,
    pub description: &'static str,
    pub license: &'static str,
    pub version: &'static str,
    pub min_number_of_workers: u32,
    pub max_number_of_workers: u32,
    /// Millicores, 1000 per CPU core.
    pub min_cpu_limit: u32,
    /// Megabytes.
    pub min_memory_limit: u32,
    pub min_gpu_limit: u32,
    pub max_gpu_limit: u32,
}

/// One command line parameter, as listed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub optional: bool,
    pub flag: &'static str,
    pub short_flag: &'static str,
    pub action: &'static str,
    pub help: &'static str,
    pub default: &'static str,
    pub ui_exposed: bool,
}

impl ParameterDescriptor {
    const fn option(
        name: &'static str,
        kind: &'static str,
        flag: &'static str,
        short_flag: &'static str,
        help: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            optional: true,
            flag,
            short_flag,
            action: "store",
            help,
            default,
            ui_exposed: true,
        }
    }
}

pub const PARAMETERS: [ParameterDescriptor; 7] = [
    ParameterDescriptor::option("xslices", "int", "--xslices", "-x", "Number of slices on the x axis", "5"),
    ParameterDescriptor::option("yslices", "int", "--yslices", "-y", "Number of slices on the y axis", "5"),
    ParameterDescriptor::option("zslices", "int", "--zslices", "-z", "Number of slices on the z axis", "5"),
    ParameterDescriptor::option(
        "rotatex",
        "int",
        "--rotatex",
        "-rx",
        "Rotate how many degrees on the x axis (positive for counter-clockwise)",
        "0",
    ),
    ParameterDescriptor::option(
        "rotatey",
        "int",
        "--rotatey",
        "-ry",
        "Rotate how many degrees on the y axis (positive for counter-clockwise)",
        "0",
    ),
    ParameterDescriptor::option(
        "rotatez",
        "int",
        "--rotatez",
        "-rz",
        "Rotate how many degrees on the z axis (positive for counter-clockwise)",
        "0",
    ),
    ParameterDescriptor::option(
        "size",
        "str",
        "--size",
        "-s",
        "The pixel size of image, like 640,480 for 640 * 480",
        "NA",
    ),
];

/// Everything `--json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct AppRepresentation {
    #[serde(flatten)]
    pub meta: PluginMeta,
    pub selfexec: &'static str,
    pub parameters: Vec<ParameterDescriptor>,
}

pub fn meta() -> PluginMeta {
    PluginMeta {
        name: PLUGIN_NAME,
        title: TITLE,
        category: "",
        kind: "ds",
        icon: "",
        authors: env!("CARGO_PKG_AUTHORS"),
        description: env!("CARGO_PKG_DESCRIPTION"),
        license: env!("CARGO_PKG_LICENSE"),
        version: VERSION,
        min_number_of_workers: 1,
        max_number_of_workers: 1,
        min_cpu_limit: 2000,
        min_memory_limit: 8000,
        min_gpu_limit: 0,
        max_gpu_limit: 0,
    }
}

pub fn app_representation() -> AppRepresentation {
    AppRepresentation {
        meta: meta(),
        selfexec: PLUGIN_NAME,
        parameters: PARAMETERS.to_vec(),
    }
}

pub fn man_page() -> String {
    format!("{BANNER}\n{SYNOPSIS}")
}

/// Write the `--json` document to `<dir>/<plugin name>.json`.
pub fn save_json(dir: impl AsRef<Path>) -> Result<PathBuf, PluginError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{PLUGIN_NAME}.json"));
    fs::write(&path, serde_json::to_string_pretty(&app_representation())?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn meta_reports_plugin_type_and_limits() {
        let value = serde_json::to_value(meta()).unwrap();
        assert_eq!(value["type"], "ds");
        assert_eq!(value["min_cpu_limit"], 2000);
        assert_eq!(value["min_memory_limit"], 8000);
        assert_eq!(value["version"], VERSION);
    }

    #[test]
    fn json_lists_every_parameter() {
        let value = serde_json::to_value(app_representation()).unwrap();
        let Value::Array(parameters) = &value["parameters"] else {
            panic!("parameters should be an array");
        };
        let flags: Vec<_> = parameters.iter().map(|p| p["short_flag"].clone()).collect();
        assert_eq!(flags, ["-x", "-y", "-z", "-rx", "-ry", "-rz", "-s"]);
        assert_eq!(value["title"], TITLE);
        assert_eq!(value["selfexec"], PLUGIN_NAME);
    }

    #[test]
    fn save_json_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_json(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("nifti_slice_grid.json"));
        let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["name"], PLUGIN_NAME);
    }

    #[test]
    fn man_page_starts_with_banner() {
        let page = man_page();
        assert!(page.starts_with(BANNER));
        assert!(page.contains("--rotatex"));
    }
}
