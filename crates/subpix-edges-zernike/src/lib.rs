//! Subpixel edge detector: improved Canny + Zernike moments.
//!
//! ## Quickstart
//!
//! ```
//! use subpix_edges_core::GrayImage;
//! use subpix_edges_zernike::{CannyZernikeDetector, CannyZernikeParams};
//!
//! let mut img = GrayImage::new(32, 32);
//! for y in 0..32 {
//!     for x in 16..32 {
//!         img.set(x, y, 200);
//!     }
//! }
//!
//! let detector = CannyZernikeDetector::new(CannyZernikeParams::default());
//! let result = detector.detect(&img.view()).unwrap();
//! println!("{} edge pixels", result.edge_map.count());
//! ```
//!
//! Pipeline:
//! 1. Four-direction gradient (0°, 45°, 90°, 135° kernels folded into two axes).
//! 2. Non-maximum suppression with 4-bin direction quantization.
//! 3. Double threshold relative to the strongest response, then hysteresis
//!    linking of weak pixels to 8-connected strong ones.
//! 4. Per-pixel 7×7 Zernike moment fit of an ideal step edge; the fitted
//!    offset along the edge normal gives the subpixel coordinate.
//!
//! The input is expected to be denoised by the caller.

mod detector;
mod error;
mod gradient;
mod hysteresis;
mod moments;
mod nms;
mod params;
mod refine;

pub use detector::{detect, validate_image, CannyZernikeDetector, EdgeDetection};
pub use error::DetectError;
pub use gradient::{gradient_field, GradientField};
pub use hysteresis::{
    classify, hysteresis_threshold, link_edges, ClassifiedGrid, EdgeClass, Thresholds,
};
pub use moments::{
    project, zernike_moments, Mask7, Patch7, ZernikeMoments, PATCH_RADIUS, PATCH_SIZE, Z00_MASK,
    Z11_IM_MASK, Z11_RE_MASK, Z20_MASK,
};
pub use nms::{non_maximum_suppression, DirectionBin};
pub use params::CannyZernikeParams;
pub use refine::{
    edge_parameters, extract_patch, refine_edges, refine_point, Degeneracy, EdgeParameters,
    PointOutcome, RefineStats, RefinedEdges, L_CLIP, MIN_Z11_NORM,
};
