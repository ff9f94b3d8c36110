use serde::{Deserialize, Serialize};

/// Value stored for a confirmed edge pixel.
pub const EDGE: u8 = 255;

/// Binary pixel-level edge map, same shape as the source image.
///
/// Marked pixels hold [`EDGE`], all others `0`, so the buffer can be written
/// out as an 8-bit image without conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl EdgeMap {
    /// Map with no edges.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    #[inline]
    pub fn mark(&mut self, x: usize, y: usize) {
        self.data[y * self.width + x] = EDGE;
    }

    /// Number of marked pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Marked pixel coordinates `(x, y)` in row-major scan order.
    pub fn edge_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(move |(idx, _)| (idx % w, idx / w))
    }

    /// Raw 0/255 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}

/// Edge location with fractional pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubpixelEdgePoint {
    pub x: f64,
    pub y: f64,
}

impl SubpixelEdgePoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point placed exactly on an integer pixel.
    #[inline]
    pub fn from_pixel(x: usize, y: usize) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }

    /// Shift by a constant offset, e.g. to map ROI-local coordinates back to
    /// the full image.
    #[inline]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
