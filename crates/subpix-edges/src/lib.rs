//! High-level facade crate for the `subpix-edges-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core types and the Canny + Zernike detector
//! - a denoise → detect pipeline with optional region of interest
//! - (feature-gated) helpers that run the pipeline on `image` crate buffers
//! - JSON config / report types used by the `subpix-edges` CLI
//!
//! ## Quickstart
//!
//! ```no_run
//! use subpix_edges::detect;
//! use subpix_edges::DetectOptions;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("part.png")?.decode()?.to_luma8();
//! let result = detect::detect_edges(&img, &DetectOptions::default())?;
//! println!("{} edge pixels", result.edge_map.count());
//! for p in result.subpixel.unwrap_or_default().iter().take(5) {
//!     println!("({:.3}, {:.3})", p.x, p.y);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `subpix_edges::core`: image buffers, edge map, subpixel points, denoise filters.
//! - `subpix_edges::zernike`: gradient, NMS, hysteresis, Zernike refinement, detector.
//! - `subpix_edges::io`: JSON config and report.
//! - `subpix_edges::detect` (feature `image`): end-to-end helpers from `image::GrayImage`.

pub use subpix_edges_core as core;
pub use subpix_edges_zernike as zernike;

pub use subpix_edges_core::{Denoise, EdgeMap, GrayImage, GrayImageView, SubpixelEdgePoint};
pub use subpix_edges_zernike::{
    CannyZernikeDetector, CannyZernikeParams, DetectError, EdgeDetection, RefineStats,
};

pub mod io;
mod pipeline;

pub use pipeline::{detect_gray, DetectOptions, EdgesError, Roi};

#[cfg(feature = "image")]
pub mod detect;
