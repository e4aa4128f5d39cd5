//! Choice of the slices taken along each axis.

use crate::enums::Axis;

use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplingError {
    #[error("Slice count must be at least 1")]
    ZeroCount,

    #[error("Cannot sample an axis of extent 0")]
    EmptyAxis,
}

/// How many slices to take along one axis and how far to rotate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    pub axis: Axis,
    pub count: NonZeroUsize,
    /// Counter-clockwise rotation in degrees.
    pub rotation_degrees: i32,
}

impl SliceSpec {
    pub fn new(axis: Axis, count: NonZeroUsize, rotation_degrees: i32) -> Self {
        Self {
            axis,
            count,
            rotation_degrees,
        }
    }

    /// 1-based slice positions for an axis of the given extent.
    pub fn indices(&self, extent: usize) -> Result<Vec<usize>, SamplingError> {
        slice_indices(self.count.get(), extent)
    }
}

/// `count` evenly spaced 1-based positions strictly inside `[1, extent]`.
///
/// Lays `count + 2` points evenly over `[1, extent]`, truncates them to
/// integers and drops the first and last so that the edge slices are never
/// picked. Positions repeat when `count` is large relative to `extent`.
///
/// Point `k` is `floor(k * step + 1)` with `step = (extent - 1) / (count + 1)`
/// evaluated in `f64`. A point that lands a rounding error below an integer
/// is truncated down.
pub fn slice_indices(count: usize, extent: usize) -> Result<Vec<usize>, SamplingError> {
    if count == 0 {
        return Err(SamplingError::ZeroCount);
    }
    if extent == 0 {
        return Err(SamplingError::EmptyAxis);
    }

    let step = (extent - 1) as f64 / (count + 1) as f64;
    Ok((1..=count)
        .map(|k| ((k as f64 * step + 1.0).floor() as usize).clamp(1, extent))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_evenly_spaced_points() {
        // points over [1, 256]: 1, 43.5, 86, 128.5, 171, 213.5, 256
        assert_eq!(slice_indices(5, 256).unwrap(), vec![43, 86, 128, 171, 213]);
        // points over [1, 150]: 1, 25.83, 50.67, 75.5, 100.33, 125.17, 150
        assert_eq!(slice_indices(5, 150).unwrap(), vec![25, 50, 75, 100, 125]);
    }

    #[test]
    fn truncation_follows_floating_point_steps() {
        // 7 * (122 / 14) evaluates just below 61.
        assert_eq!(
            slice_indices(13, 123).unwrap(),
            vec![9, 18, 27, 35, 44, 53, 61, 70, 79, 88, 96, 105, 114]
        );
        // 11 * (30 / 22) evaluates just below 15.
        assert_eq!(slice_indices(21, 31).unwrap()[10], 15);
        assert_eq!(
            slice_indices(21, 31).unwrap(),
            vec![
                2, 3, 5, 6, 7, 9, 10, 11, 13, 14, 15, 17, 18, 20, 21, 22, 24, 25, 26, 28, 29
            ]
        );
    }

    #[test]
    fn single_slice_is_the_middle() {
        assert_eq!(slice_indices(1, 11).unwrap(), vec![6]);
        assert_eq!(slice_indices(1, 1).unwrap(), vec![1]);
    }

    #[test]
    fn indices_repeat_on_short_axes() {
        assert_eq!(slice_indices(4, 2).unwrap(), vec![1, 1, 1, 1]);
        assert_eq!(slice_indices(3, 3).unwrap(), vec![1, 2, 2]);
    }

    #[test]
    fn indices_stay_in_bounds_and_sorted() {
        for extent in 1..=64 {
            for count in 1..=extent {
                let indices = slice_indices(count, extent).unwrap();
                assert_eq!(indices.len(), count);
                assert!(indices.iter().all(|&i| (1..=extent).contains(&i)));
                assert!(indices.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(slice_indices(0, 10), Err(SamplingError::ZeroCount));
        assert_eq!(slice_indices(3, 0), Err(SamplingError::EmptyAxis));
    }

    #[test]
    fn spec_delegates_to_its_count() {
        let spec = SliceSpec::new(Axis::Y, NonZeroUsize::new(2).unwrap(), 90);
        assert_eq!(spec.indices(10).unwrap(), vec![4, 7]);
    }
}
