//! Double threshold and single-pass edge tracking by hysteresis.
//!
//! Thresholds are relative to the strongest thinned response:
//! `high = max · high_ratio`, `low = high · low_ratio`. Strong pixels are
//! always kept; a weak pixel is kept only when one of its 8 neighbors is
//! strong. Promotion is not transitive: a weak pixel touching only other
//! weak pixels is dropped.

use log::debug;
use subpix_edges_core::{EdgeMap, GrayImage};

/// Absolute thresholds derived from the thinned magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub low: f32,
    pub high: f32,
}

impl Thresholds {
    /// `high = max_value · high_ratio`, `low = high · low_ratio`.
    pub fn from_ratios(max_value: u8, low_ratio: f32, high_ratio: f32) -> Self {
        let high = max_value as f32 * high_ratio;
        Self {
            low: high * low_ratio,
            high,
        }
    }

    #[inline]
    pub fn classify(&self, value: u8) -> EdgeClass {
        let v = value as f32;
        if v >= self.high {
            EdgeClass::Strong
        } else if v >= self.low {
            EdgeClass::Weak
        } else {
            EdgeClass::None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeClass {
    None,
    Weak,
    Strong,
}

/// Classification of every pixel of a thinned grid.
#[derive(Clone, Debug)]
pub struct ClassifiedGrid {
    pub width: usize,
    pub height: usize,
    pub classes: Vec<EdgeClass>,
}

impl ClassifiedGrid {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> EdgeClass {
        self.classes[y * self.width + x]
    }

    pub fn count(&self, class: EdgeClass) -> usize {
        self.classes.iter().filter(|&&c| c == class).count()
    }

    fn has_strong_neighbor(&self, x: usize, y: usize) -> bool {
        let x0 = x.saturating_sub(1);
        let y0 = y.saturating_sub(1);
        let x1 = (x + 1).min(self.width - 1);
        let y1 = (y + 1).min(self.height - 1);
        (y0..=y1).any(|ny| {
            (x0..=x1).any(|nx| (nx, ny) != (x, y) && self.get(nx, ny) == EdgeClass::Strong)
        })
    }
}

/// Split the thinned grid into strong / weak / none.
///
/// A grid whose maximum is zero has no candidates at all and classifies
/// every pixel as `None` instead of letting a zero threshold mark everything.
pub fn classify(thinned: &GrayImage, thresholds: &Thresholds) -> ClassifiedGrid {
    let classes = if thresholds.high <= 0.0 {
        vec![EdgeClass::None; thinned.data.len()]
    } else {
        thinned.data.iter().map(|&v| thresholds.classify(v)).collect()
    };
    ClassifiedGrid {
        width: thinned.width,
        height: thinned.height,
        classes,
    }
}

/// Keep strong pixels and weak pixels 8-connected to a strong one.
pub fn link_edges(grid: &ClassifiedGrid) -> EdgeMap {
    let mut edges = EdgeMap::empty(grid.width, grid.height);
    for y in 0..grid.height {
        for x in 0..grid.width {
            let keep = match grid.get(x, y) {
                EdgeClass::Strong => true,
                EdgeClass::Weak => grid.has_strong_neighbor(x, y),
                EdgeClass::None => false,
            };
            if keep {
                edges.mark(x, y);
            }
        }
    }
    edges
}

/// Double-threshold `thinned` and link weak pixels to strong ones.
pub fn hysteresis_threshold(thinned: &GrayImage, low_ratio: f32, high_ratio: f32) -> EdgeMap {
    let thresholds = Thresholds::from_ratios(thinned.max_value(), low_ratio, high_ratio);
    let grid = classify(thinned, &thresholds);
    let edges = link_edges(&grid);
    debug!(
        "low={:.3} high={:.3} strong={} weak={} kept={}",
        thresholds.low,
        thresholds.high,
        grid.count(EdgeClass::Strong),
        grid.count(EdgeClass::Weak),
        edges.count()
    );
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(w: usize, h: usize, values: &[u8]) -> GrayImage {
        GrayImage::from_raw(w, h, values.to_vec()).unwrap()
    }

    #[test]
    fn thresholds_scale_from_maximum() {
        let t = Thresholds::from_ratios(200, 0.5, 0.25);
        assert_eq!(t.high, 50.0);
        assert_eq!(t.low, 25.0);
        assert_eq!(t.classify(50), EdgeClass::Strong);
        assert_eq!(t.classify(49), EdgeClass::Weak);
        assert_eq!(t.classify(25), EdgeClass::Weak);
        assert_eq!(t.classify(24), EdgeClass::None);
    }

    #[test]
    fn weak_next_to_strong_is_promoted() {
        #[rustfmt::skip]
        let thinned = grid(5, 5, &[
            0, 0,   0,  0, 0,
            0, 200, 0,  0, 0,
            0, 0,   30, 0, 0,
            0, 0,   0,  0, 0,
            0, 0,   0,  0, 0,
        ]);
        let edges = hysteresis_threshold(&thinned, 0.2, 0.5);
        assert!(edges.is_edge(1, 1));
        assert!(edges.is_edge(2, 2));
        assert_eq!(edges.count(), 2);
    }

    #[test]
    fn isolated_weak_is_dropped() {
        #[rustfmt::skip]
        let thinned = grid(6, 5, &[
            0, 0,   0, 0,  0,  0,
            0, 200, 0, 0,  0,  0,
            0, 0,   0, 30, 30, 0,
            0, 0,   0, 0,  0,  0,
            0, 0,   0, 0,  0,  0,
        ]);
        let edges = hysteresis_threshold(&thinned, 0.2, 0.5);
        assert!(edges.is_edge(1, 1));
        assert!(!edges.is_edge(3, 2));
        assert!(!edges.is_edge(4, 2));
    }

    #[test]
    fn promotion_is_not_transitive() {
        let thinned = grid(5, 1, &[200, 30, 30, 30, 0]);
        let edges = hysteresis_threshold(&thinned, 0.2, 0.5);
        let kept: Vec<_> = edges.edge_pixels().collect();
        assert_eq!(kept, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn all_zero_grid_yields_empty_map() {
        let thinned = GrayImage::new(8, 8);
        let edges = hysteresis_threshold(&thinned, 0.05, 0.15);
        assert!(edges.is_blank());
    }

    #[test]
    fn corner_pixels_only_see_in_image_neighbors() {
        let thinned = grid(3, 3, &[30, 0, 0, 0, 0, 0, 0, 0, 200]);
        let edges = hysteresis_threshold(&thinned, 0.2, 0.5);
        assert!(!edges.is_edge(0, 0));
        assert!(edges.is_edge(2, 2));
    }
}
