//! Non-maximum suppression over a [`GradientField`].
//!
//! Gradient direction is folded into `[0°, 180°]` and quantized to four
//! 45°-wide bins centered on 0°, 45°, 90° and 135°. A pixel survives when its
//! magnitude is not smaller than either of the two neighbors picked by its
//! bin. Surviving magnitudes are saturated to 255 and truncated to 8 bits.
//!
//! The outermost 1-pixel frame is never evaluated and stays zero, which keeps
//! every neighbor lookup in bounds.

use subpix_edges_core::GrayImage;

use crate::gradient::GradientField;

/// Quantized direction bin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionBin {
    Deg0,
    Deg45,
    Deg90,
    Deg135,
}

impl DirectionBin {
    /// Bin for a gradient direction given in radians.
    pub fn from_radians(direction: f64) -> Self {
        let mut angle = direction.to_degrees();
        if angle < 0.0 {
            angle += 180.0;
        }
        if angle < 22.5 || angle >= 157.5 {
            DirectionBin::Deg0
        } else if (22.5..67.5).contains(&angle) {
            DirectionBin::Deg45
        } else if (67.5..112.5).contains(&angle) {
            DirectionBin::Deg90
        } else {
            DirectionBin::Deg135
        }
    }

    /// `(dx, dy)` offsets of the two compared neighbors.
    pub fn neighbor_offsets(self) -> [(isize, isize); 2] {
        match self {
            DirectionBin::Deg0 => [(1, 0), (-1, 0)],
            DirectionBin::Deg45 => [(-1, 1), (1, -1)],
            DirectionBin::Deg90 => [(0, 1), (0, -1)],
            DirectionBin::Deg135 => [(-1, -1), (1, 1)],
        }
    }
}

/// Thin the gradient magnitude to 1-pixel-wide ridges.
pub fn non_maximum_suppression(grad: &GradientField) -> GrayImage {
    let w = grad.width();
    let h = grad.height();
    let mut suppressed = GrayImage::new(w, h);
    if w < 3 || h < 3 {
        return suppressed;
    }

    let mag = &grad.magnitude;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let m = mag.get(x, y);
            let bin = DirectionBin::from_radians(grad.direction.get(x, y));
            let is_max = bin.neighbor_offsets().iter().all(|&(dx, dy)| {
                let nx = (x as isize + dx) as usize;
                let ny = (y as isize + dy) as usize;
                m >= mag.get(nx, ny)
            });
            if is_max {
                suppressed.set(x, y, m.min(255.0) as u8);
            }
        }
    }

    suppressed
}
