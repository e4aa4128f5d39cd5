use crate::volume::Volume;

use ndarray::{ArrayD, Axis as NdAxis, Ix3};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// File name suffixes recognised as volumes, longest first.
pub const VOLUME_SUFFIXES: [&str; 2] = [".nii.gz", ".nii"];

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("Expected a 3D volume, found {0} dimensions")]
    NotThreeDimensional(usize),

    #[error("Volume has an empty axis: {0:?}")]
    EmptyAxis(Vec<usize>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Decode a NIfTI-1 file (`.nii` or `.nii.gz`) into a volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if its
    /// data is not three-dimensional once trailing singleton axes are
    /// dropped.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Volume, VolumeLoaderError> {
        let path = path.as_ref();
        let object = ReaderOptions::new().read_file(path)?;
        debug!(
            path = %path.display(),
            datatype = object.header().datatype,
            "decoded header"
        );
        let data = object.into_volume().into_ndarray::<f32>()?;
        Self::from_ndarray(data)
    }

    /// Build a volume from a decoded array of any dimensionality.
    pub fn from_ndarray(mut data: ArrayD<f32>) -> Result<Volume, VolumeLoaderError> {
        while data.ndim() > 3 && data.shape()[data.ndim() - 1] == 1 {
            let last = data.ndim() - 1;
            data = data.index_axis_move(NdAxis(last), 0);
        }

        if data.ndim() != 3 {
            return Err(VolumeLoaderError::NotThreeDimensional(data.ndim()));
        }
        if data.shape().contains(&0) {
            return Err(VolumeLoaderError::EmptyAxis(data.shape().to_vec()));
        }

        Ok(Volume::new(data.into_dimensionality::<Ix3>()?))
    }

    /// List the volume files of `dir`, sorted by file name.
    ///
    /// Entries whose name does not end in a recognised suffix are skipped.
    pub fn list_volume_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, VolumeLoaderError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if Self::volume_stem(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// File name without its volume suffix, or `None` for non-volume files.
    pub fn volume_stem(path: &Path) -> Option<&str> {
        let name = path.file_name()?.to_str()?;
        VOLUME_SUFFIXES
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix))
            .filter(|stem| !stem.is_empty())
    }

    /// Name of the image written for the volume at `path`.
    pub fn output_file_name(path: &Path) -> Option<String> {
        Self::volume_stem(path).map(|stem| format!("{stem}.png"))
    }
}
