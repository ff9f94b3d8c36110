use log::debug;
use subpix_edges_core::{EdgeMap, GrayImageView, SubpixelEdgePoint};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::gradient::gradient_field;
use crate::hysteresis::hysteresis_threshold;
use crate::nms::non_maximum_suppression;
use crate::refine::{refine_edges, RefineStats};
use crate::{CannyZernikeParams, DetectError};

/// Output of one detector run.
#[derive(Clone, Debug)]
pub struct EdgeDetection {
    /// Pixel-level edges after hysteresis.
    pub edge_map: EdgeMap,
    /// One refined point per marked pixel in row-major order; `None` when the
    /// subpixel pass is disabled.
    pub subpixel: Option<Vec<SubpixelEdgePoint>>,
    /// Counters from the subpixel pass, `None` when it is disabled.
    pub refine_stats: Option<RefineStats>,
}

/// Four-direction Canny edge detector with Zernike subpixel refinement.
///
/// The input is expected to be denoised already (see
/// `subpix_edges_core::Denoise`); the subpixel pass reads the same image the
/// pixel edges were found in.
#[derive(Clone, Debug, Default)]
pub struct CannyZernikeDetector {
    params: CannyZernikeParams,
}

impl CannyZernikeDetector {
    pub fn new(params: CannyZernikeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CannyZernikeParams {
        &self.params
    }

    /// Run gradient, thinning, hysteresis and (optionally) subpixel
    /// refinement on `img`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, img), fields(width = img.width, height = img.height))
    )]
    pub fn detect(&self, img: &GrayImageView<'_>) -> Result<EdgeDetection, DetectError> {
        validate_image(img)?;
        self.params.validate()?;

        let edge_map = self.pixel_edges(img);

        let (subpixel, refine_stats) = if self.params.apply_subpixel {
            let refined = refine_edges(&edge_map, img);
            (Some(refined.points), Some(refined.stats))
        } else {
            (None, None)
        };

        Ok(EdgeDetection {
            edge_map,
            subpixel,
            refine_stats,
        })
    }

    fn pixel_edges(&self, img: &GrayImageView<'_>) -> EdgeMap {
        let grad = gradient_field(img);
        debug!(
            "gradient: {}x{} max magnitude {:.1}",
            img.width,
            img.height,
            grad.magnitude.max_value()
        );

        let thinned = non_maximum_suppression(&grad);
        debug!(
            "nms: {} candidates, max {}",
            thinned.data.iter().filter(|&&v| v > 0).count(),
            thinned.max_value()
        );

        hysteresis_threshold(
            &thinned,
            self.params.low_threshold_ratio,
            self.params.high_threshold_ratio,
        )
    }
}

/// Reject empty images and buffers that do not match their dimensions.
pub fn validate_image(img: &GrayImageView<'_>) -> Result<(), DetectError> {
    if img.is_empty() {
        return Err(DetectError::EmptyImage {
            width: img.width,
            height: img.height,
        });
    }
    let expected = img
        .width
        .checked_mul(img.height)
        .ok_or(DetectError::EmptyImage {
            width: img.width,
            height: img.height,
        })?;
    if img.data.len() != expected {
        return Err(DetectError::InvalidBuffer {
            expected,
            got: img.data.len(),
        });
    }
    Ok(())
}

/// One-shot detection with explicit threshold ratios.
///
/// Returns the pixel edge map and, when `apply_subpixel` is set, the refined
/// points.
pub fn detect(
    img: &GrayImageView<'_>,
    low_threshold_ratio: f32,
    high_threshold_ratio: f32,
    apply_subpixel: bool,
) -> Result<(EdgeMap, Option<Vec<SubpixelEdgePoint>>), DetectError> {
    let params = CannyZernikeParams {
        low_threshold_ratio,
        high_threshold_ratio,
        apply_subpixel,
    };
    let result = CannyZernikeDetector::new(params).detect(img)?;
    Ok((result.edge_map, result.subpixel))
}
