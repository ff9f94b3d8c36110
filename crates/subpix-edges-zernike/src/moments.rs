//! Zernike moment templates on a 7×7 support.
//!
//! The masks are the discretized orthogonal basis functions `V00`, `V11`
//! (complex, stored as separate real and imaginary kernels) and `V20`
//! integrated over the unit disc inscribed in a 7×7 pixel window. Projecting a
//! patch on them yields the three moments needed to fit an ideal step edge.

use nalgebra::Complex;

/// Side length of the moment support.
pub const PATCH_SIZE: usize = 7;
/// Half-width of the moment support (`PATCH_SIZE / 2`).
pub const PATCH_RADIUS: usize = PATCH_SIZE / 2;

pub type Mask7 = [[f64; PATCH_SIZE]; PATCH_SIZE];
pub type Patch7 = [[f64; PATCH_SIZE]; PATCH_SIZE];

#[rustfmt::skip]
pub const Z00_MASK: Mask7 = [
    [0.0,    0.0287, 0.0686, 0.0807, 0.0686, 0.0287, 0.0],
    [0.0287, 0.0815, 0.0816, 0.0816, 0.0816, 0.0815, 0.0287],
    [0.0686, 0.0816, 0.0816, 0.0816, 0.0816, 0.0816, 0.0686],
    [0.0807, 0.0816, 0.0816, 0.0816, 0.0816, 0.0816, 0.0807],
    [0.0686, 0.0816, 0.0816, 0.0816, 0.0816, 0.0816, 0.0686],
    [0.0287, 0.0815, 0.0816, 0.0816, 0.0816, 0.0815, 0.0287],
    [0.0,    0.0287, 0.0686, 0.0807, 0.0686, 0.0287, 0.0],
];

#[rustfmt::skip]
pub const Z11_RE_MASK: Mask7 = [
    [0.0,     -0.015,  -0.019,  0.0, 0.019,  0.015,  0.0],
    [-0.0224, -0.0466, -0.0233, 0.0, 0.0233, 0.0466, 0.0224],
    [-0.0573, -0.0466, -0.0233, 0.0, 0.0233, 0.0466, 0.0573],
    [-0.069,  -0.0466, -0.0233, 0.0, 0.0233, 0.0466, 0.069],
    [-0.0573, -0.0466, -0.0233, 0.0, 0.0233, 0.0466, 0.0573],
    [-0.0224, -0.0466, -0.0233, 0.0, 0.0233, 0.0466, 0.0224],
    [0.0,     -0.015,  -0.019,  0.0, 0.019,  0.015,  0.0],
];

#[rustfmt::skip]
pub const Z11_IM_MASK: Mask7 = [
    [0.0,    -0.0224, -0.0573, -0.069,  -0.0573, -0.0224, 0.0],
    [-0.015, -0.0466, -0.0466, -0.0466, -0.0466, -0.0466, -0.015],
    [-0.019, -0.0233, -0.0233, -0.0233, -0.0233, -0.0233, -0.019],
    [0.0,    0.0,     0.0,     0.0,     0.0,     0.0,     0.0],
    [0.019,  0.0233,  0.0233,  0.0233,  0.0233,  0.0233,  0.019],
    [0.015,  0.0466,  0.0466,  0.0466,  0.0466,  0.0466,  0.015],
    [0.0,    0.0224,  0.0573,  0.069,   0.0573,  0.0224,  0.0],
];

#[rustfmt::skip]
pub const Z20_MASK: Mask7 = [
    [0.0,    0.0225,  0.0394,  0.0396,  0.0394,  0.0225,  0.0],
    [0.0225, 0.0271,  -0.0128, -0.0261, -0.0128, 0.0271,  0.0225],
    [0.0394, -0.0128, -0.0528, -0.0661, -0.0528, -0.0128, 0.0394],
    [0.0396, -0.0261, -0.0661, -0.0794, -0.0661, -0.0261, 0.0396],
    [0.0394, -0.0128, -0.0528, -0.0661, -0.0528, -0.0128, 0.0394],
    [0.0225, 0.0271,  -0.0128, -0.0261, -0.0128, 0.0271,  0.0225],
    [0.0,    0.0225,  0.0394,  0.0396,  0.0394,  0.0225,  0.0],
];

/// Projections of one patch onto the moment basis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZernikeMoments {
    pub z00: f64,
    pub z11: Complex<f64>,
    pub z20: f64,
}

/// `Σ patch[i][j] · mask[i][j]`.
#[inline]
pub fn project(patch: &Patch7, mask: &Mask7) -> f64 {
    patch
        .iter()
        .zip(mask.iter())
        .map(|(p_row, m_row)| p_row.iter().zip(m_row.iter()).map(|(p, m)| p * m).sum::<f64>())
        .sum()
}

/// Project a 7×7 patch onto `Z00`, `Z11` and `Z20`.
pub fn zernike_moments(patch: &Patch7) -> ZernikeMoments {
    ZernikeMoments {
        z00: project(patch, &Z00_MASK),
        z11: Complex::new(project(patch, &Z11_RE_MASK), project(patch, &Z11_IM_MASK)),
        z20: project(patch, &Z20_MASK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mask_sum(mask: &Mask7) -> f64 {
        mask.iter().flatten().sum()
    }

    #[test]
    fn z00_integrates_to_unit_disc_area() {
        assert_abs_diff_eq!(mask_sum(&Z00_MASK), std::f64::consts::PI, epsilon = 2e-3);
    }

    #[test]
    fn z11_imaginary_is_transposed_real() {
        for i in 0..PATCH_SIZE {
            for j in 0..PATCH_SIZE {
                assert_eq!(Z11_IM_MASK[i][j], Z11_RE_MASK[j][i]);
                assert_eq!(Z11_RE_MASK[i][j], -Z11_RE_MASK[i][PATCH_SIZE - 1 - j]);
            }
        }
    }

    #[test]
    fn constant_patch_has_no_first_order_response() {
        let patch = [[100.0; PATCH_SIZE]; PATCH_SIZE];
        let m = zernike_moments(&patch);
        assert_abs_diff_eq!(m.z00, 314.08, epsilon = 1e-9);
        assert_abs_diff_eq!(m.z11.re, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.z11.im, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.z20, 0.02, epsilon = 1e-9);
    }

    #[test]
    fn vertical_step_points_z11_along_x() {
        let mut patch = [[10.0; PATCH_SIZE]; PATCH_SIZE];
        for row in &mut patch {
            for v in &mut row[4..] {
                *v = 90.0;
            }
        }
        let m = zernike_moments(&patch);
        assert!(m.z11.re > 0.0);
        assert_abs_diff_eq!(m.z11.im, 0.0, epsilon = 1e-9);
    }
}
