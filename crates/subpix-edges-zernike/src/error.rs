/// Errors returned by the edge detector.
///
/// Only malformed input is reported; an image without edges is a regular,
/// empty result.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("image is empty (width={width}, height={height})")]
    EmptyImage { width: usize, height: usize },

    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid threshold ratios (low={low}, high={high}); expected 0 < low < high < 1")]
    InvalidThresholds { low: f32, high: f32 },
}
