use ndarray::{Array2, ArrayView2, Axis as NdAxis, Zip};

pub struct Interpolator;

impl Interpolator {
    /// Sample `slice` at the fractional position `(y, x)`.
    ///
    /// Positions outside the slice take the value of the nearest edge pixel.
    #[inline]
    pub fn bilinear_interpolate(slice: &ArrayView2<f32>, y: f32, x: f32) -> f32 {
        let (height, width) = slice.dim();
        let y = y.clamp(0.0, (height - 1) as f32);
        let x = x.clamp(0.0, (width - 1) as f32);

        let (y0, x0) = (y.floor() as usize, x.floor() as usize);
        let (y1, x1) = ((y0 + 1).min(height - 1), (x0 + 1).min(width - 1));
        let (dy, dx) = (y - y0 as f32, x - x0 as f32);

        let lerp = |a: f32, b: f32, t: f32| (b - a).mul_add(t, a);
        let top = lerp(slice[[y0, x0]], slice[[y0, x1]], dx);
        let bottom = lerp(slice[[y1, x0]], slice[[y1, x1]], dx);
        lerp(top, bottom, dy)
    }

    /// Rotate `slice` counter-clockwise (as displayed, row 0 on top).
    ///
    /// The output grows to the bounding box of the rotated input so nothing
    /// is cropped. Quarter turns are exact; other angles are resampled
    /// bilinearly and positions falling outside the input take the value of
    /// the nearest edge pixel.
    pub fn rotate(slice: &ArrayView2<f32>, degrees: i32) -> Array2<f32> {
        match degrees.rem_euclid(360) {
            0 => slice.to_owned(),
            90 => {
                let mut view = slice.t();
                view.invert_axis(NdAxis(0));
                view.to_owned()
            }
            180 => {
                let mut view = slice.view();
                view.invert_axis(NdAxis(0));
                view.invert_axis(NdAxis(1));
                view.to_owned()
            }
            270 => {
                let mut view = slice.t();
                view.invert_axis(NdAxis(1));
                view.to_owned()
            }
            _ => Self::rotate_resampled(slice, degrees),
        }
    }

    /// Shape `(rows, columns)` of `dim` after rotating by `degrees`.
    pub fn rotated_dim(dim: (usize, usize), degrees: i32) -> (usize, usize) {
        let (height, width) = dim;
        let (sin, cos) = (degrees as f64).to_radians().sin_cos();
        let (h, w) = (height as f64, width as f64);
        let out_w = (w * cos.abs() + h * sin.abs() + 0.5).floor() as usize;
        let out_h = (w * sin.abs() + h * cos.abs() + 0.5).floor() as usize;
        (out_h.max(1), out_w.max(1))
    }

    fn rotate_resampled(slice: &ArrayView2<f32>, degrees: i32) -> Array2<f32> {
        let (height, width) = slice.dim();
        let (out_h, out_w) = Self::rotated_dim((height, width), degrees);
        let (sin, cos) = (degrees as f32).to_radians().sin_cos();

        let in_cy = (height as f32 - 1.0) / 2.0;
        let in_cx = (width as f32 - 1.0) / 2.0;
        let out_cy = (out_h as f32 - 1.0) / 2.0;
        let out_cx = (out_w as f32 - 1.0) / 2.0;

        let mut rotated = Array2::<f32>::zeros((out_h, out_w));
        Zip::indexed(&mut rotated).par_for_each(|(row, col), value| {
            // Inverse mapping, rows grow downwards.
            let dx = col as f32 - out_cx;
            let dy = row as f32 - out_cy;
            let src_x = dx * cos - dy * sin + in_cx;
            let src_y = dx * sin + dy * cos + in_cy;
            *value = Self::bilinear_interpolate(slice, src_y, src_x);
        });
        rotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Array2<f32> {
        array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
    }

    #[test]
    fn zero_and_full_turns_are_identity() {
        let slice = sample();
        assert_eq!(Interpolator::rotate(&slice.view(), 0), slice);
        assert_eq!(Interpolator::rotate(&slice.view(), 360), slice);
        assert_eq!(Interpolator::rotate(&slice.view(), -720), slice);
    }

    #[test]
    fn quarter_turns_match_rot90() {
        let slice = sample();
        assert_eq!(
            Interpolator::rotate(&slice.view(), 90),
            array![[3.0f32, 6.0], [2.0, 5.0], [1.0, 4.0]]
        );
        assert_eq!(
            Interpolator::rotate(&slice.view(), 180),
            array![[6.0f32, 5.0, 4.0], [3.0, 2.0, 1.0]]
        );
        assert_eq!(
            Interpolator::rotate(&slice.view(), -90),
            array![[4.0f32, 1.0], [5.0, 2.0], [6.0, 3.0]]
        );
    }

    #[test]
    fn resampled_rotation_grows_to_fit() {
        let slice = Array2::<f32>::ones((10, 20));
        let rotated = Interpolator::rotate(&slice.view(), 45);
        // 20 * cos45 + 10 * sin45 = 21.2
        assert_eq!(rotated.dim(), (21, 21));
        // Nearest-edge extrapolation keeps a constant image constant.
        assert!(rotated.iter().all(|&v| (v - 1.0).abs() < 1e-5));
    }

    #[test]
    fn resampled_rotation_keeps_the_centre() {
        let mut slice = Array2::<f32>::zeros((9, 9));
        slice[[4, 4]] = 1.0;
        let rotated = Interpolator::rotate(&slice.view(), 45);
        let (h, w) = rotated.dim();
        assert_eq!((h, w), (13, 13));
        assert!((rotated[[h / 2, w / 2]] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let slice = array![[0.0f32, 10.0], [20.0, 30.0]];
        let v = Interpolator::bilinear_interpolate(&slice.view(), 0.5, 0.5);
        assert!((v - 15.0).abs() < 1e-6);
    }

    #[test]
    fn bilinear_clamps_to_the_nearest_edge() {
        let slice = array![[0.0f32, 10.0], [20.0, 30.0]];
        let view = slice.view();
        assert_eq!(Interpolator::bilinear_interpolate(&view, -3.0, -0.5), 0.0);
        assert_eq!(Interpolator::bilinear_interpolate(&view, 7.0, 9.0), 30.0);
        let v = Interpolator::bilinear_interpolate(&view, -1.0, 0.5);
        assert!((v - 5.0).abs() < 1e-6);
    }
}
