//! Composition of the slice grid.
//!
//! Every volume becomes one figure with a row per axis. Each cell holds a
//! colour-mapped, optionally rotated slice under a caption of the form
//! `"{index}/{extent} ∠{rotation}°"`. Cells have no ticks or frames.

use crate::config::{CanvasSize, DEFAULT_DPI};
use crate::enums::Axis;
use crate::interpolator::Interpolator;
use crate::sampling::{SamplingError, SliceSpec};
use crate::volume::Volume;

use image::{ImageFormat, RgbImage, imageops, imageops::FilterType};
use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, trace};

/// One row per axis.
pub const GRID_ROWS: usize = 3;

// Figure margins as fractions of the canvas.
const MARGIN_LEFT: f64 = 0.125;
const MARGIN_RIGHT: f64 = 0.1;
const MARGIN_TOP: f64 = 0.12;
const MARGIN_BOTTOM: f64 = 0.11;
// Gap between cells as a fraction of the cell size.
const CELL_SPACING: f64 = 0.4;
const CAPTION_POINTS: f64 = 12.0;
const CAPTION_FONT: &str = "sans-serif";
static CAPTION_FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot sample the {axis} axis: {source}")]
    Sampling {
        axis: Axis,
        #[source]
        source: SamplingError,
    },

    #[error("Slice {index} is outside the {axis} axis")]
    SliceOutOfRange { axis: Axis, index: usize },

    #[error("Drawing failed: {0}")]
    Draw(String),

    #[error("The embedded caption font could not be parsed")]
    Font,

    #[error("Pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

fn draw_error(error: impl std::error::Error) -> RenderError {
    RenderError::Draw(error.to_string())
}

/// Make the bundled caption font available to the bitmap backend.
///
/// Registration happens once per process; later calls report the first
/// outcome.
fn register_caption_font() -> Result<(), RenderError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED.get_or_init(|| {
        register_font(CAPTION_FONT, FontStyle::Normal, CAPTION_FONT_DATA).is_ok()
    });
    if registered {
        Ok(())
    } else {
        Err(RenderError::Font)
    }
}

/// A single slice placed in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub axis: Axis,
    pub row: usize,
    pub column: usize,
    /// 1-based position along `axis`.
    pub index: usize,
    pub extent: usize,
    pub rotation_degrees: i32,
}

impl GridCell {
    pub fn caption(&self) -> String {
        format!("{}/{} ∠{}°", self.index, self.extent, self.rotation_degrees)
    }
}

/// Which slice goes into which cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    /// Lay out `slices` (one spec per row) for `volume`.
    ///
    /// Row `r` holds exactly the count of `slices[r]`, left-aligned; the grid
    /// is as wide as the largest count.
    pub fn plan(volume: &Volume, slices: &[SliceSpec; GRID_ROWS]) -> Result<Self, RenderError> {
        let columns = slices.iter().map(|spec| spec.count.get()).max().unwrap_or(1);
        let mut cells = Vec::with_capacity(slices.iter().map(|spec| spec.count.get()).sum());

        for (row, spec) in slices.iter().enumerate() {
            let extent = volume.extent(spec.axis);
            let indices = spec
                .indices(extent)
                .map_err(|source| RenderError::Sampling {
                    axis: spec.axis,
                    source,
                })?;
            cells.extend(indices.into_iter().enumerate().map(|(column, index)| GridCell {
                axis: spec.axis,
                row,
                column,
                index,
                extent,
                rotation_degrees: spec.rotation_degrees,
            }));
        }

        Ok(Self { columns, cells })
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = &GridCell> {
        self.cells.iter().filter(move |cell| cell.row == row)
    }
}

/// Renders the annotated slice grid of one volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceGridRenderer {
    canvas: CanvasSize,
}

impl SliceGridRenderer {
    pub fn new(canvas: CanvasSize) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Render the grid and encode it as PNG at `path`.
    pub fn render_to_file(
        &self,
        volume: &Volume,
        slices: &[SliceSpec; GRID_ROWS],
        path: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        let path = path.as_ref();
        let figure = self.render(volume, slices)?;
        figure
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| RenderError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "wrote figure");
        Ok(())
    }

    /// Render the grid into an RGB image of the configured canvas size.
    pub fn render(
        &self,
        volume: &Volume,
        slices: &[SliceSpec; GRID_ROWS],
    ) -> Result<RgbImage, RenderError> {
        register_caption_font()?;
        let layout = GridLayout::plan(volume, slices)?;
        let images = layout
            .cells
            .par_iter()
            .map(|cell| slice_image(volume, cell))
            .collect::<Result<Vec<_>, _>>()?;

        let CanvasSize { width, height } = self.canvas;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            let (w, h) = (width as f64, height as f64);
            let plot = root.margin(
                (h * MARGIN_TOP) as i32,
                (h * MARGIN_BOTTOM) as i32,
                (w * MARGIN_LEFT) as i32,
                (w * MARGIN_RIGHT) as i32,
            );
            let areas = plot.split_evenly((GRID_ROWS, layout.columns));

            for (cell, image) in layout.cells.iter().zip(&images) {
                let area = &areas[cell.row * layout.columns + cell.column];
                self.draw_cell(area, cell, image)?;
            }

            root.present().map_err(draw_error)?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::BufferSize { width, height })
    }

    fn draw_cell(
        &self,
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        cell: &GridCell,
        image: &RgbImage,
    ) -> Result<(), RenderError> {
        let (cell_w, cell_h) = pixel_extent(area);
        let pad_x = (cell_w as f64 * CELL_SPACING / (2.0 * (1.0 + CELL_SPACING))) as i32;
        let pad_y = (cell_h as f64 * CELL_SPACING / (2.0 * (1.0 + CELL_SPACING))) as i32;
        let padded = area.margin(pad_y / 2, pad_y - pad_y / 2, pad_x, pad_x);

        let font_px = (CAPTION_POINTS * DEFAULT_DPI as f64 / 72.0)
            .min(cell_h as f64 * 0.3)
            .max(6.0);
        let body = padded
            .titled(&cell.caption(), (CAPTION_FONT, font_px))
            .map_err(draw_error)?;

        let (avail_w, avail_h) = pixel_extent(&body);
        if avail_w == 0 || avail_h == 0 {
            trace!(axis = %cell.axis, index = cell.index, "no room left for the slice");
            return Ok(());
        }

        let (fit_w, fit_h) = fit_within(image.dimensions(), (avail_w, avail_h));
        let resized = imageops::resize(image, fit_w, fit_h, FilterType::Triangle);
        let offset = (((avail_w - fit_w) / 2) as i32, ((avail_h - fit_h) / 2) as i32);
        let element: BitMapElement<'_, (i32, i32)> =
            BitMapElement::with_owned_buffer(offset, (fit_w, fit_h), resized.into_raw()).ok_or(
                RenderError::BufferSize {
                    width: fit_w,
                    height: fit_h,
                },
            )?;
        body.draw(&element).map_err(draw_error)?;

        trace!(
            axis = %cell.axis,
            index = cell.index,
            row = cell.row,
            column = cell.column,
            "placed slice"
        );
        Ok(())
    }
}

/// Extract, rotate and colour the slice shown in `cell`.
fn slice_image(volume: &Volume, cell: &GridCell) -> Result<RgbImage, RenderError> {
    let slice = volume
        .get_slice_from_axis(cell.index - 1, cell.axis)
        .ok_or(RenderError::SliceOutOfRange {
            axis: cell.axis,
            index: cell.index,
        })?;
    let rotated = Interpolator::rotate(&slice, cell.rotation_degrees);
    colorize(&rotated.view())
}

/// Width and height of `area`, zero when margins have collapsed it.
fn pixel_extent(area: &DrawingArea<BitMapBackend<'_>, Shift>) -> (u32, u32) {
    let (xs, ys) = area.get_pixel_range();
    (
        (xs.end - xs.start).max(0) as u32,
        (ys.end - ys.start).max(0) as u32,
    )
}

/// Largest size with the aspect ratio of `image` that fits in `bounds`.
pub fn fit_within(image: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let scale = (bounds.0 as f64 / image.0 as f64).min(bounds.1 as f64 / image.1 as f64);
    let w = ((image.0 as f64 * scale).round() as u32).clamp(1, bounds.0.max(1));
    let h = ((image.1 as f64 * scale).round() as u32).clamp(1, bounds.1.max(1));
    (w, h)
}

/// Map a slice onto the viridis palette, scaled to its own value range.
///
/// Row 0 of the slice is the top row of the image. Constant slices and
/// non-finite values take the lowest colour.
pub fn colorize(slice: &ArrayView2<f32>) -> Result<RgbImage, RenderError> {
    let (rows, cols) = slice.dim();
    let (min, max) = slice
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    let pixel_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map_iter(move |row| {
            slice.row(row).into_iter().flat_map(move |&value| {
                let t = if range > 0.0 && value.is_finite() {
                    ((value - min) / range).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let RGBColor(r, g, b) = ViridisRGB::get_color(t);
                [r, g, b]
            })
        })
        .collect();

    let (width, height) = (cols as u32, rows as u32);
    RgbImage::from_raw(width, height, pixel_data).ok_or(RenderError::BufferSize { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3, array};
    use std::num::NonZeroUsize;

    fn specs(counts: [usize; 3], rotations: [i32; 3]) -> [SliceSpec; 3] {
        Axis::ALL.map(|axis| {
            SliceSpec::new(
                axis,
                NonZeroUsize::new(counts[axis.index()]).unwrap(),
                rotations[axis.index()],
            )
        })
    }

    fn volume(shape: (usize, usize, usize)) -> Volume {
        Volume::new(Array3::from_shape_fn(shape, |(x, y, z)| (x + 2 * y + 3 * z) as f32))
    }

    #[test]
    fn layout_has_one_cell_per_slice() {
        let layout = GridLayout::plan(&volume((20, 16, 12)), &specs([2, 5, 3], [0; 3])).unwrap();
        assert_eq!(layout.columns, 5);
        assert_eq!(layout.cells.len(), 2 + 5 + 3);
        for (row, expected) in [2, 5, 3].into_iter().enumerate() {
            let cells: Vec<_> = layout.row(row).collect();
            assert_eq!(cells.len(), expected);
            assert!(cells.iter().all(|c| c.axis == Axis::ALL[row]));
            let columns: Vec<_> = cells.iter().map(|c| c.column).collect();
            assert_eq!(columns, (0..expected).collect::<Vec<_>>());
        }
    }

    #[test]
    fn layout_records_extent_and_rotation() {
        let layout = GridLayout::plan(&volume((20, 16, 12)), &specs([1, 1, 1], [10, 0, -90])).unwrap();
        let captions: Vec<_> = layout.cells.iter().map(GridCell::caption).collect();
        assert_eq!(captions, vec!["10/20 ∠10°", "8/16 ∠0°", "6/12 ∠-90°"]);
    }

    #[test]
    fn colorize_spans_the_palette() {
        let slice = array![[0.0f32, 1.0], [0.5, 1.0]];
        let image = colorize(&slice.view()).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0).0, [68, 1, 84]);
        assert_eq!(image.get_pixel(1, 0).0, [254, 232, 37]);
        assert_eq!(image.get_pixel(1, 1).0, [254, 232, 37]);
    }

    #[test]
    fn constant_slices_take_the_lowest_colour() {
        let slice = Array2::<f32>::from_elem((3, 4), 7.0);
        let image = colorize(&slice.view()).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert!(image.pixels().all(|p| p.0 == [68, 1, 84]));
    }

    #[test]
    fn colorize_follows_logical_order_of_transposed_views() {
        let slice = array![[0.0f32, 1.0, 1.0], [0.0, 0.0, 0.0]];
        let transposed = slice.t();
        let image = colorize(&transposed).unwrap();
        assert_eq!(image.dimensions(), (2, 3));
        assert_eq!(image.get_pixel(0, 1).0, [254, 232, 37]);
        assert_eq!(image.get_pixel(1, 1).0, [68, 1, 84]);
    }

    #[test]
    fn caption_font_is_bundled() {
        assert!(register_caption_font().is_ok());
        assert!(register_caption_font().is_ok());
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        assert_eq!(fit_within((256, 128), (100, 100)), (100, 50));
        assert_eq!(fit_within((10, 40), (100, 100)), (25, 100));
        assert_eq!(fit_within((1000, 1), (10, 10)), (10, 1));
    }

    #[test]
    fn render_fills_the_requested_canvas() {
        let renderer = SliceGridRenderer::new(CanvasSize {
            width: 320,
            height: 240,
        });
        let image = renderer
            .render(&volume((12, 10, 8)), &specs([3, 2, 1], [0, 45, 90]))
            .unwrap();
        assert_eq!(image.dimensions(), (320, 240));
        // The corner is outside every cell.
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
        // Some slice pixels were drawn.
        assert!(image.pixels().any(|p| p.0 != [255, 255, 255]));
    }
}
