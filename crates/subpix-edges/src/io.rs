//! JSON configuration and report helpers for edge detection runs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::core::SubpixelEdgePoint;
use crate::pipeline::{DetectOptions, EdgesError};
use crate::zernike::{EdgeDetection, RefineStats};

#[derive(thiserror::Error, Debug)]
pub enum EdgesIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}

/// Configuration for one detection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectConfig {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub edges_path: Option<String>,
    #[serde(default)]
    pub options: DetectOptions,
}

impl DetectConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, EdgesIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), EdgesIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("edge_report.json"))
    }
}

/// Result of a detection run as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeReport {
    pub image_path: String,
    pub width: usize,
    pub height: usize,
    pub options: DetectOptions,
    pub num_edge_pixels: usize,
    #[serde(default)]
    pub edge_pixels: Vec<[usize; 2]>,
    #[serde(default)]
    pub subpixel: Option<Vec<SubpixelEdgePoint>>,
    #[serde(default)]
    pub refine_stats: Option<RefineStats>,
    #[serde(default)]
    pub edges_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl EdgeReport {
    /// Build an empty report for an image of the given size.
    pub fn new(cfg: &DetectConfig, width: usize, height: usize) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            width,
            height,
            options: cfg.options.clone(),
            num_edge_pixels: 0,
            edge_pixels: Vec::new(),
            subpixel: None,
            refine_stats: None,
            edges_path: cfg.edges_path.clone(),
            error: None,
        }
    }

    /// Populate report fields from a successful detection.
    pub fn set_detection(&mut self, res: EdgeDetection) {
        self.edge_pixels = res.edge_map.edge_pixels().map(|(x, y)| [x, y]).collect();
        self.num_edge_pixels = self.edge_pixels.len();
        self.subpixel = res.subpixel;
        self.refine_stats = res.refine_stats;
        self.error = None;
    }

    /// Record a detection error.
    pub fn set_error(&mut self, err: &EdgesError) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, EdgesIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), EdgesIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Save an edge map as an 8-bit image; the format follows the file extension.
#[cfg(feature = "image")]
pub fn write_edge_map(
    edges: &crate::core::EdgeMap,
    path: impl AsRef<Path>,
) -> Result<(), EdgesIoError> {
    crate::detect::edge_map_image(edges).save(path)?;
    Ok(())
}
