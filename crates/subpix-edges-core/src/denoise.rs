//! Edge-preserving preprocessing applied before edge detection.
//!
//! Both filters read neighbors through [`reflect101`] and round the result
//! back to 8 bits. The detector itself never denoises; callers pick one of
//! these (or their own) and pass the filtered image in.

use serde::{Deserialize, Serialize};

use crate::{reflect101, GrayImage, GrayImageView};

/// Preprocessing choice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Denoise {
    /// Use the input unchanged.
    None,
    /// Bilateral filter over a disc of `diameter` pixels.
    Bilateral {
        diameter: usize,
        sigma_color: f32,
        sigma_space: f32,
    },
    /// Separable Gaussian blur with an odd `kernel_size`.
    Gaussian { kernel_size: usize, sigma: f32 },
}

impl Default for Denoise {
    fn default() -> Self {
        Self::bilateral()
    }
}

impl Denoise {
    /// Bilateral filter with `d = 9`, `sigma_color = sigma_space = 75`.
    pub fn bilateral() -> Self {
        Self::Bilateral {
            diameter: 9,
            sigma_color: 75.0,
            sigma_space: 75.0,
        }
    }

    /// 5×5 Gaussian with `sigma = 1.4`.
    pub fn gaussian() -> Self {
        Self::Gaussian {
            kernel_size: 5,
            sigma: 1.4,
        }
    }

    /// Run the selected filter, always producing a new owned image.
    pub fn apply(&self, src: &GrayImageView<'_>) -> GrayImage {
        match *self {
            Denoise::None => src.to_owned_image(),
            Denoise::Bilateral {
                diameter,
                sigma_color,
                sigma_space,
            } => bilateral_filter(src, diameter, sigma_color, sigma_space),
            Denoise::Gaussian { kernel_size, sigma } => gaussian_blur(src, kernel_size, sigma),
        }
    }
}

#[inline]
fn round_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Bilateral filter: each output pixel is a weighted mean over a disc of
/// radius `diameter / 2`, weights falling off with spatial distance
/// (`sigma_space`) and with intensity difference (`sigma_color`).
pub fn bilateral_filter(
    src: &GrayImageView<'_>,
    diameter: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> GrayImage {
    let (w, h) = (src.width, src.height);
    let mut out = GrayImage::new(w, h);
    if src.is_empty() {
        return out;
    }

    let radius = (diameter / 2).max(1) as isize;
    let space_coeff = -0.5 / (sigma_space * sigma_space).max(f32::EPSILON);
    let color_coeff = -0.5 / (sigma_color * sigma_color).max(f32::EPSILON);

    let mut taps: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2 > (radius * radius) as f32 {
                continue;
            }
            taps.push((dx, dy, (r2 * space_coeff).exp()));
        }
    }
    let color_lut: Vec<f32> = (0..256)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    for y in 0..h {
        for x in 0..w {
            let center = src.get(x, y);
            let mut sum = 0.0f32;
            let mut wsum = 0.0f32;
            for &(dx, dy, ws) in &taps {
                let xx = reflect101(x as isize + dx, w);
                let yy = reflect101(y as isize + dy, h);
                let v = src.get(xx, yy);
                let weight = ws * color_lut[v.abs_diff(center) as usize];
                sum += weight * v as f32;
                wsum += weight;
            }
            out.set(x, y, round_u8(sum / wsum));
        }
    }
    out
}

/// Normalized 1-D Gaussian taps of odd length `size`.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let size = size.max(1) | 1;
    let half = (size / 2) as f32;
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        // Derived from the kernel size when not given.
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let mut taps: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= total;
    }
    taps
}

/// Separable Gaussian blur with `kernel_size × kernel_size` support.
pub fn gaussian_blur(src: &GrayImageView<'_>, kernel_size: usize, sigma: f32) -> GrayImage {
    let (w, h) = (src.width, src.height);
    let mut out = GrayImage::new(w, h);
    if src.is_empty() {
        return out;
    }

    let kernel = gaussian_kernel(kernel_size, sigma);
    let half = (kernel.len() / 2) as isize;

    let mut horiz = vec![0.0f32; w * h];
    for y in 0..h {
        let row = src.row(y);
        for x in 0..w {
            horiz[y * w + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, &kw)| kw * row[reflect101(x as isize + k as isize - half, w)] as f32)
                .sum();
        }
    }

    for y in 0..h {
        for x in 0..w {
            let v: f32 = kernel
                .iter()
                .enumerate()
                .map(|(k, &kw)| kw * horiz[reflect101(y as isize + k as isize - half, h) * w + x])
                .sum();
            out.set(x, y, round_u8(v));
        }
    }
    out
}
