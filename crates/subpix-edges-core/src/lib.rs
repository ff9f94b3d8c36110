//! Core types for subpixel edge detection.
//!
//! This crate holds the image buffers shared by the detector and its callers,
//! the edge map / subpixel point result types, and the denoise filters that
//! are expected to run before detection. It does not depend on any concrete
//! image I/O crate.

mod denoise;
mod edge_map;
mod image;
mod logger;

pub use denoise::{bilateral_filter, gaussian_blur, gaussian_kernel, Denoise};
pub use edge_map::{EdgeMap, SubpixelEdgePoint, EDGE};
pub use image::{reflect101, GrayImage, GrayImageView, ImageF64};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
