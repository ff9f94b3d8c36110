//! Four-direction gradient estimate.
//!
//! Correlates the image with horizontal, vertical, 45° and 135° 3×3 kernels
//! and folds the diagonal responses into the two axis components:
//!
//! ```text
//! fx = Px + (P45 + P135) / 2
//! fy = Py + (P45 - P135) / 2
//! ```
//!
//! Kernels are applied without flipping (correlation). Borders use
//! reflect-101 indexing, so the outermost ring mirrors its inner neighbor
//! rather than repeating itself.

use subpix_edges_core::{reflect101, GrayImageView, ImageF64};

type Kernel3 = [[f64; 3]; 3];

const KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];
const KERNEL_45: Kernel3 = [[0.0, 1.0, 2.0], [-1.0, 0.0, 1.0], [-2.0, -1.0, 0.0]];
const KERNEL_135: Kernel3 = [[-2.0, -1.0, 0.0], [-1.0, 0.0, 1.0], [0.0, 1.0, 2.0]];

/// Gradient magnitude and direction, co-indexed with the source image.
#[derive(Clone, Debug)]
pub struct GradientField {
    /// `sqrt(fx² + fy²)`, non-negative
    pub magnitude: ImageF64,
    /// `atan2(fy, fx)` in radians, range (-π, π]
    pub direction: ImageF64,
}

impl GradientField {
    pub fn width(&self) -> usize {
        self.magnitude.w
    }

    pub fn height(&self) -> usize {
        self.magnitude.h
    }
}

#[inline]
fn correlate(window: &[[f64; 3]; 3], kernel: &Kernel3) -> f64 {
    let mut acc = 0.0;
    for (w_row, k_row) in window.iter().zip(kernel.iter()) {
        acc += w_row[0] * k_row[0] + w_row[1] * k_row[1] + w_row[2] * k_row[2];
    }
    acc
}

/// Compute the combined four-direction gradient of `img`.
pub fn gradient_field(img: &GrayImageView<'_>) -> GradientField {
    let w = img.width;
    let h = img.height;
    let mut magnitude = ImageF64::new(w, h);
    let mut direction = ImageF64::new(w, h);

    if img.is_empty() {
        return GradientField {
            magnitude,
            direction,
        };
    }

    for y in 0..h {
        let rows = [
            img.row(reflect101(y as isize - 1, h)),
            img.row(y),
            img.row(reflect101(y as isize + 1, h)),
        ];
        let out_mag = magnitude.row_mut(y);
        for x in 0..w {
            let xs = [
                reflect101(x as isize - 1, w),
                x,
                reflect101(x as isize + 1, w),
            ];
            let mut window = [[0.0f64; 3]; 3];
            for (win_row, src_row) in window.iter_mut().zip(rows.iter()) {
                for (v, &xx) in win_row.iter_mut().zip(xs.iter()) {
                    *v = src_row[xx] as f64;
                }
            }

            let px = correlate(&window, &KERNEL_X);
            let py = correlate(&window, &KERNEL_Y);
            let p45 = correlate(&window, &KERNEL_45);
            let p135 = correlate(&window, &KERNEL_135);

            let fx = px + (p45 + p135) / 2.0;
            let fy = py + (p45 - p135) / 2.0;

            out_mag[x] = (fx * fx + fy * fy).sqrt();
            direction.set(x, y, fy.atan2(fx));
        }
    }

    GradientField {
        magnitude,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;
    use subpix_edges_core::GrayImage;

    fn image_from_fn(w: usize, h: usize, f: impl Fn(usize, usize) -> u8) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, f(x, y));
            }
        }
        img
    }

    #[test]
    fn output_shape_matches_input() {
        let img = image_from_fn(13, 7, |x, y| (x * 7 + y * 3) as u8);
        let g = gradient_field(&img.view());
        assert_eq!(g.magnitude.shape(), (13, 7));
        assert_eq!(g.direction.shape(), (13, 7));
    }

    #[test]
    fn uniform_image_has_zero_gradient() {
        let img = image_from_fn(8, 8, |_, _| 77);
        let g = gradient_field(&img.view());
        assert!(g.magnitude.data.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn vertical_step_responds_along_x() {
        let img = image_from_fn(10, 6, |x, _| if x < 5 { 50 } else { 200 });
        let g = gradient_field(&img.view());
        // Px = 4·150, diagonals add (450 + 450) / 2, vertical parts cancel.
        for x in [4, 5] {
            assert_relative_eq!(g.magnitude.get(x, 3), 1050.0);
            assert_relative_eq!(g.direction.get(x, 3), 0.0);
        }
        assert_eq!(g.magnitude.get(2, 3), 0.0);
    }

    #[test]
    fn horizontal_step_responds_along_y() {
        let img = image_from_fn(6, 10, |_, y| if y < 5 { 50 } else { 200 });
        let g = gradient_field(&img.view());
        // Py = 600, (P45 - P135) / 2 = (-450 - 450) / 2.
        for y in [4, 5] {
            assert_relative_eq!(g.magnitude.get(3, y), 150.0);
            assert_relative_eq!(g.direction.get(3, y), FRAC_PI_2);
        }
    }

    #[test]
    fn ramp_matches_double_precision_reference() {
        // Interior of a 3x + 7y ramp: Px = 24, Py = 56, P45 = -24, P135 = 60,
        // so fx = 42 and fy = 14.
        let img = image_from_fn(8, 8, |x, y| (3 * x + 7 * y) as u8);
        let g = gradient_field(&img.view());
        let (fx, fy) = (42.0f64, 14.0f64);
        assert_eq!(g.magnitude.get(3, 3), (fx * fx + fy * fy).sqrt());
        assert_eq!(g.direction.get(3, 3), fy.atan2(fx));
    }

    #[test]
    fn border_uses_reflect101() {
        // Column 0 mirrors column 1, so a ramp starting at the border sees
        // equal values on both sides and no horizontal response.
        let img = image_from_fn(5, 3, |x, _| (x * 10) as u8);
        let g = gradient_field(&img.view());
        assert_eq!(g.magnitude.get(0, 1), 0.0);
        assert!(g.magnitude.get(1, 1) > 0.0);
    }
}
