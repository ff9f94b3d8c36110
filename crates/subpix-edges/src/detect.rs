use crate::core::{EdgeMap, GrayImageView};
use crate::pipeline::{detect_gray, DetectOptions, EdgesError};
use crate::zernike::EdgeDetection;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Convert an `image::GrayImage` into the lightweight `subpix-edges-core` view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Denoise, detect and refine edges in an 8-bit grayscale image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, opts), fields(width = img.width(), height = img.height()))
)]
pub fn detect_edges(
    img: &::image::GrayImage,
    opts: &DetectOptions,
) -> Result<EdgeDetection, EdgesError> {
    detect_gray(&gray_view(img), opts)
}

/// Same as [`detect_edges`] for any decoded image; color input is converted to
/// 8-bit luma first.
pub fn detect_edges_dynamic(
    img: &::image::DynamicImage,
    opts: &DetectOptions,
) -> Result<EdgeDetection, EdgesError> {
    let gray = img.to_luma8();
    detect_edges(&gray, opts)
}

/// Build an `image::GrayImage` from a raw grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, EdgesError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(EdgesError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(EdgesError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(EdgesError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(EdgesError::InvalidGrayDimensions { width, height })
}

pub fn detect_edges_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    opts: &DetectOptions,
) -> Result<EdgeDetection, EdgesError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    detect_edges(&img, opts)
}

/// Render an edge map as a black/white 8-bit image.
pub fn edge_map_image(edges: &EdgeMap) -> ::image::GrayImage {
    let raw = edges.as_raw();
    let width = edges.width;
    ::image::GrayImage::from_fn(edges.width as u32, edges.height as u32, |x, y| {
        ::image::Luma([raw[y as usize * width + x as usize]])
    })
}
