use crate::config::Config;
use crate::renderer::{RenderError, SliceGridRenderer};
use crate::volume_loader::{VolumeLoader, VolumeLoaderError};

use std::{fs, path::PathBuf};
use thiserror::Error;
use tracing::{info, info_span};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Cannot list {}: {source}", dir.display())]
    List {
        dir: PathBuf,
        #[source]
        source: VolumeLoaderError,
    },

    #[error("Cannot create output directory {}: {source}", dir.display())]
    OutputDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: VolumeLoaderError,
    },

    #[error("Failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
}

/// Images written by a run, in processing order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
}

/// Convert every volume of `config.input_dir` into a grid image.
///
/// Files are handled one at a time in file name order. The first failure
/// stops the run; images written before it stay on disk.
pub fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    let inputs =
        VolumeLoader::list_volume_files(&config.input_dir).map_err(|source| PipelineError::List {
            dir: config.input_dir.clone(),
            source,
        })?;
    info!(
        count = inputs.len(),
        dir = %config.input_dir.display(),
        "found volumes"
    );

    fs::create_dir_all(&config.output_dir).map_err(|source| PipelineError::OutputDir {
        dir: config.output_dir.clone(),
        source,
    })?;

    let renderer = SliceGridRenderer::new(config.canvas);
    let mut summary = RunSummary::default();

    for path in inputs {
        let Some(name) = VolumeLoader::output_file_name(&path) else {
            continue;
        };
        let _span = info_span!("volume", file = %path.display()).entered();

        let volume = VolumeLoader::load_from_file(&path).map_err(|source| PipelineError::Load {
            path: path.clone(),
            source,
        })?;
        let (x, y, z) = volume.dim();
        info!(x, y, z, "loaded volume");

        let output = config.output_dir.join(name);
        renderer
            .render_to_file(&volume, &config.slices, &output)
            .map_err(|source| PipelineError::Render {
                path: path.clone(),
                source,
            })?;
        info!(output = %output.display(), "wrote slice grid");
        summary.written.push(output);
    }

    Ok(summary)
}
