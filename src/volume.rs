use crate::enums::Axis;

use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::s;

/// A decoded scan, indexed `[x, y, z]`.
#[derive(Debug, Clone, Default)]
pub struct Volume {
    pub data: Array3<f32>,
}

impl Volume {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensions of the volume (x, y, z)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Number of voxels along `axis`.
    pub fn extent(&self, axis: Axis) -> usize {
        self.data.shape()[axis.index()]
    }

    /// Cross-section orthogonal to `axis` at the 0-based `index`.
    ///
    /// Returns `None` when `index` lies outside the volume.
    pub fn get_slice_from_axis(&self, index: usize, axis: Axis) -> Option<ArrayView2<'_, f32>> {
        if !self.is_valid_index(index, axis) {
            return None;
        }
        let slice = match axis {
            Axis::X => self.data.slice(s![index, .., ..]),
            Axis::Y => self.data.slice(s![.., index, ..]),
            Axis::Z => self.data.slice(s![.., .., index]),
        };
        Some(slice)
    }

    fn is_valid_index(&self, index: usize, axis: Axis) -> bool {
        index < self.extent(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(shape: (usize, usize, usize)) -> Volume {
        let (_, ny, nz) = shape;
        Volume::new(Array3::from_shape_fn(shape, |(x, y, z)| {
            (x * ny * nz + y * nz + z) as f32
        }))
    }

    #[test]
    fn extent_follows_shape() {
        let volume = ramp((4, 3, 2));
        assert_eq!(volume.extent(Axis::X), 4);
        assert_eq!(volume.extent(Axis::Y), 3);
        assert_eq!(volume.extent(Axis::Z), 2);
    }

    #[test]
    fn slices_are_orthogonal_to_their_axis() {
        let volume = ramp((4, 3, 2));

        let x = volume.get_slice_from_axis(1, Axis::X).unwrap();
        assert_eq!(x.dim(), (3, 2));
        assert_eq!(x[[2, 1]], volume.data[[1, 2, 1]]);

        let y = volume.get_slice_from_axis(2, Axis::Y).unwrap();
        assert_eq!(y.dim(), (4, 2));
        assert_eq!(y[[3, 0]], volume.data[[3, 2, 0]]);

        let z = volume.get_slice_from_axis(1, Axis::Z).unwrap();
        assert_eq!(z.dim(), (4, 3));
        assert_eq!(z[[0, 2]], volume.data[[0, 2, 1]]);
    }

    #[test]
    fn out_of_range_index_yields_none() {
        let volume = ramp((4, 3, 2));
        assert!(volume.get_slice_from_axis(4, Axis::X).is_none());
        assert!(volume.get_slice_from_axis(2, Axis::Z).is_none());
    }
}
