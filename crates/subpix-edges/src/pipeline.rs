//! Preprocess, detect, and map results back to full-image coordinates.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Denoise, EdgeMap, GrayImage, GrayImageView};
use crate::zernike::{CannyZernikeDetector, CannyZernikeParams, DetectError, EdgeDetection};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum EdgesError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error("region {roi} does not fit in a {width}x{height} image")]
    RoiOutOfBounds {
        roi: Roi,
        width: usize,
        height: usize,
    },

    #[error(transparent)]
    Detect(#[from] DetectError),
}

/// Axis-aligned region of interest in pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Non-empty and fully inside an `img_w` × `img_h` image.
    pub fn fits(&self, img_w: usize, img_h: usize) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= img_w)
            && self.y.checked_add(self.height).is_some_and(|b| b <= img_h)
    }

    /// Copy the region out of `img`.
    pub fn crop(&self, img: &GrayImageView<'_>) -> Result<GrayImage, EdgesError> {
        if !self.fits(img.width, img.height) {
            return Err(EdgesError::RoiOutOfBounds {
                roi: *self,
                width: img.width,
                height: img.height,
            });
        }
        let mut data = Vec::with_capacity(self.width * self.height);
        for y in self.y..self.y + self.height {
            data.extend_from_slice(&img.row(y)[self.x..self.x + self.width]);
        }
        Ok(GrayImage {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for Roi {
    type Err = String;

    /// Parse `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid ROI '{s}': {e}"))?;
        match parts.as_slice() {
            &[x, y, width, height] => Ok(Self::new(x, y, width, height)),
            _ => Err(format!("invalid ROI '{s}': expected x,y,width,height")),
        }
    }
}

/// Everything needed to run detection on a raw grayscale image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectOptions {
    pub params: CannyZernikeParams,
    pub denoise: Denoise,
    pub roi: Option<Roi>,
}

impl DetectOptions {
    pub fn with_params(mut self, params: CannyZernikeParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_denoise(mut self, denoise: Denoise) -> Self {
        self.denoise = denoise;
        self
    }

    pub fn with_roi(mut self, roi: Roi) -> Self {
        self.roi = Some(roi);
        self
    }
}

/// Run denoise + detection on `img`, honoring the ROI.
///
/// With a ROI, only the cropped region is filtered and searched; the returned
/// edge map has the full image size and subpixel points are in full-image
/// coordinates.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, opts), fields(width = img.width, height = img.height))
)]
pub fn detect_gray(
    img: &GrayImageView<'_>,
    opts: &DetectOptions,
) -> Result<EdgeDetection, EdgesError> {
    crate::zernike::validate_image(img)?;
    let detector = CannyZernikeDetector::new(opts.params.clone());

    let Some(roi) = opts.roi else {
        let filtered = opts.denoise.apply(img);
        return Ok(detector.detect(&filtered.view())?);
    };

    let cropped = roi.crop(img)?;
    debug!("roi {roi}: detecting on {}x{} crop", roi.width, roi.height);
    let filtered = opts.denoise.apply(&cropped.view());
    let local = detector.detect(&filtered.view())?;
    Ok(place_in_image(local, roi, img.width, img.height))
}

/// Shift a detection made on a ROI crop into full-image coordinates.
fn place_in_image(local: EdgeDetection, roi: Roi, width: usize, height: usize) -> EdgeDetection {
    let mut edge_map = EdgeMap::empty(width, height);
    for (x, y) in local.edge_map.edge_pixels() {
        edge_map.mark(x + roi.x, y + roi.y);
    }
    let (dx, dy) = (roi.x as f64, roi.y as f64);
    let subpixel = local
        .subpixel
        .map(|pts| pts.into_iter().map(|p| p.translated(dx, dy)).collect());
    EdgeDetection {
        edge_map,
        subpixel,
        refine_stats: local.refine_stats,
    }
}
