//! Zernike-moment subpixel refinement of pixel-level edges.
//!
//! Each marked pixel is refined independently from the 7×7 neighborhood of
//! the grayscale image it was detected in. The patch is modeled as an ideal
//! step edge; the moments give its normal angle `phi`, step height `k`,
//! background `h` and normalized distance `l` from the patch center, and the
//! refined location is the center shifted by `(N/2)·(l/2)` along the normal.
//!
//! Points that cannot be refined keep their integer coordinates:
//! - pixels closer than 3 px to the image border (patch would leave the image);
//! - patches listed in [`Degeneracy`].

use std::f64::consts::PI;

use log::debug;
use nalgebra::Complex;
use serde::{Deserialize, Serialize};
use subpix_edges_core::{EdgeMap, GrayImageView, SubpixelEdgePoint};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::moments::{zernike_moments, Patch7, ZernikeMoments, PATCH_RADIUS, PATCH_SIZE};

/// Bound applied to the normalized edge distance `l`.
pub const L_CLIP: f64 = 0.99;

/// Below this `|Z11|` the patch carries no first-order (edge) signal.
pub const MIN_Z11_NORM: f64 = 1e-9;

/// Step edge fitted to one patch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeParameters {
    /// Edge normal angle in radians.
    pub phi: f64,
    /// Background level.
    pub h: f64,
    /// Step height.
    pub k: f64,
    /// Normalized distance from the patch center, in `[-L_CLIP, L_CLIP]`.
    pub l: f64,
}

impl EdgeParameters {
    /// Displacement of the edge from the patch center in pixels.
    pub fn offset(&self) -> (f64, f64) {
        let scale = (PATCH_SIZE as f64 / 2.0) * (self.l / 2.0);
        (scale * self.phi.cos(), scale * self.phi.sin())
    }
}

/// Numeric failure modes of the step-edge fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degeneracy {
    /// `|Z11|` is (near) zero; the rotated moment ratio is undefined.
    FlatPatch,
    /// The raw normalized distance is NaN or infinite.
    NonFiniteDistance,
    /// The refined coordinate is NaN or infinite.
    NonFiniteOffset,
}

/// Fit step-edge parameters to a set of moments.
pub fn edge_parameters(m: &ZernikeMoments) -> Result<EdgeParameters, Degeneracy> {
    let z11 = m.z11;
    let norm = z11.norm();
    if norm.is_nan() || norm < MIN_Z11_NORM {
        return Err(Degeneracy::FlatPatch);
    }

    let phi = z11.im.atan2(z11.re);
    let z11_rotated = z11 * Complex::from_polar(1.0, -phi);
    let z11_prime = Complex::new(m.z20, 0.0) / z11_rotated;
    if !z11_prime.re.is_finite() {
        return Err(Degeneracy::NonFiniteDistance);
    }
    let l = z11_prime.re.clamp(-L_CLIP, L_CLIP);

    let one_minus_l2 = 1.0 - l * l;
    let k = (Complex::from_polar(3.0 * norm, phi) / (2.0 * one_minus_l2.powf(1.5))).re;
    let h = m.z00 - (k * PI / 2.0 + k * l.atan() + k * l * one_minus_l2.sqrt()) / PI;

    Ok(EdgeParameters { phi, h, k, l })
}

/// 7×7 neighborhood centered on `(x, y)`, or `None` when it would leave the
/// image.
pub fn extract_patch(img: &GrayImageView<'_>, x: usize, y: usize) -> Option<Patch7> {
    let r = PATCH_RADIUS;
    if x < r || y < r || x + r + 1 > img.width || y + r + 1 > img.height {
        return None;
    }
    let mut patch = [[0.0; PATCH_SIZE]; PATCH_SIZE];
    for (i, patch_row) in patch.iter_mut().enumerate() {
        let src = &img.row(y - r + i)[x - r..x + r + 1];
        for (dst, &v) in patch_row.iter_mut().zip(src.iter()) {
            *dst = v as f64;
        }
    }
    Some(patch)
}

/// What happened to one edge pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointOutcome {
    Refined(EdgeParameters),
    Border,
    Degenerate(Degeneracy),
}

/// Refine a single edge pixel. Never fails: unrefinable points come back
/// with their integer coordinates.
pub fn refine_point(
    img: &GrayImageView<'_>,
    x: usize,
    y: usize,
) -> (SubpixelEdgePoint, PointOutcome) {
    let pixel = SubpixelEdgePoint::from_pixel(x, y);
    let Some(patch) = extract_patch(img, x, y) else {
        return (pixel, PointOutcome::Border);
    };

    let params = match edge_parameters(&zernike_moments(&patch)) {
        Ok(params) => params,
        Err(d) => return (pixel, PointOutcome::Degenerate(d)),
    };

    let (dx, dy) = params.offset();
    let refined = pixel.translated(dx, dy);
    if !(refined.x.is_finite() && refined.y.is_finite()) {
        return (pixel, PointOutcome::Degenerate(Degeneracy::NonFiniteOffset));
    }
    (refined, PointOutcome::Refined(params))
}

/// Per-pass counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineStats {
    pub refined: usize,
    pub border: usize,
    pub flat_patch: usize,
    pub non_finite: usize,
}

impl RefineStats {
    fn record(&mut self, outcome: &PointOutcome) {
        match outcome {
            PointOutcome::Refined(_) => self.refined += 1,
            PointOutcome::Border => self.border += 1,
            PointOutcome::Degenerate(Degeneracy::FlatPatch) => self.flat_patch += 1,
            PointOutcome::Degenerate(_) => self.non_finite += 1,
        }
    }

    /// Points that kept their integer coordinates.
    pub fn fallbacks(&self) -> usize {
        self.border + self.flat_patch + self.non_finite
    }

    pub fn total(&self) -> usize {
        self.refined + self.fallbacks()
    }
}

/// Subpixel points for every marked pixel, in row-major order.
#[derive(Clone, Debug, Default)]
pub struct RefinedEdges {
    pub points: Vec<SubpixelEdgePoint>,
    pub stats: RefineStats,
}

/// Refine every pixel of `edges` against `img`.
///
/// `img` must be the image the edge map was computed from; both must have the
/// same shape.
pub fn refine_edges(edges: &EdgeMap, img: &GrayImageView<'_>) -> RefinedEdges {
    debug_assert_eq!((edges.width, edges.height), (img.width, img.height));

    let pixels: Vec<(usize, usize)> = edges.edge_pixels().collect();

    #[cfg(feature = "rayon")]
    let results: Vec<(SubpixelEdgePoint, PointOutcome)> = pixels
        .par_iter()
        .map(|&(x, y)| refine_point(img, x, y))
        .collect();
    #[cfg(not(feature = "rayon"))]
    let results: Vec<(SubpixelEdgePoint, PointOutcome)> = pixels
        .iter()
        .map(|&(x, y)| refine_point(img, x, y))
        .collect();

    let mut stats = RefineStats::default();
    let mut points = Vec::with_capacity(results.len());
    for (point, outcome) in results {
        stats.record(&outcome);
        points.push(point);
    }

    debug!(
        "refined={} border={} flat={} non_finite={}",
        stats.refined, stats.border, stats.flat_patch, stats.non_finite
    );
    RefinedEdges { points, stats }
}
