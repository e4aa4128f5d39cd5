//! # NIfTI slice grid
//!
//! This crate turns NIfTI-1 volumes into a single overview image per volume.
//!
//! For each volume a number of evenly spaced slices is taken along each of
//! the three axes. The outermost positions are never used, so the slices
//! stay away from the (usually empty) borders of the scan. Every slice can
//! be rotated by a per-axis angle and is then placed into a grid:
//!  - Row 1: slices orthogonal to the x axis
//!  - Row 2: slices orthogonal to the y axis
//!  - Row 3: slices orthogonal to the z axis
//!
//! Each slice is colour-mapped to its own value range and captioned with
//! `index/extent ∠rotation°`. The grid is encoded as PNG.
//!
//! The binary wraps this as a pipeline plugin that maps an input directory
//! of `.nii` / `.nii.gz` files to an output directory of `.png` files.
//!
//! # Examples
//!
//! ## Rendering one volume
//!
//! ```no_run
//! # use nifti_slice_grid::{CanvasSize, Config, SliceGridRenderer, VolumeLoader};
//! let config = Config::new("in", "out", [5, 5, 5], [0, 90, 0], "NA")
//!     .expect("should have accepted the parameters");
//! let volume = VolumeLoader::load_from_file("in/SAG-anon.nii")
//!     .expect("should have decoded the volume");
//! SliceGridRenderer::new(CanvasSize::default())
//!     .render_to_file(&volume, &config.slices, "out/SAG-anon.png")
//!     .expect("should have written the grid");
//! ```
//!
//! ## Converting a directory
//!
//! ```no_run
//! # use nifti_slice_grid::{Config, pipeline};
//! let config = Config::new("in", "out", [3, 3, 3], [0; 3], "1280,960")
//!     .expect("should have accepted the parameters");
//! let summary = pipeline::run(&config).expect("should have converted every volume");
//! println!("wrote {} images", summary.written.len());
//! ```

pub mod cli;
pub mod config;
pub mod enums;
pub mod interpolator;
pub mod pipeline;
pub mod plugin;
pub mod renderer;
pub mod sampling;
pub mod volume;
pub mod volume_loader;

pub use config::{CanvasSize, Config, ConfigError};
pub use enums::Axis;
pub use renderer::{GridLayout, RenderError, SliceGridRenderer};
pub use sampling::{SliceSpec, slice_indices};
pub use volume::Volume;
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
