#![allow(dead_code)]

use subpix_edges_core::GrayImage;

/// `dark` on columns `< first_bright_col`, `bright` from there on.
pub fn vertical_step(
    w: usize,
    h: usize,
    first_bright_col: usize,
    dark: u8,
    bright: u8,
) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            img.set(x, y, if x < first_bright_col { dark } else { bright });
        }
    }
    img
}

/// `dark` on rows `< first_bright_row`, `bright` from there on.
pub fn horizontal_step(
    w: usize,
    h: usize,
    first_bright_row: usize,
    dark: u8,
    bright: u8,
) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            img.set(x, y, if y < first_bright_row { dark } else { bright });
        }
    }
    img
}

/// Bright disc on a dark background with deterministic additive noise.
pub fn noisy_disc(w: usize, h: usize, radius: f32, noise_amp: u8, seed: u64) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let mut state = seed;
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let base: i32 = if dx * dx + dy * dy <= radius * radius {
                190
            } else {
                60
            };
            state = lcg_next(state);
            let span = 2 * noise_amp as i32 + 1;
            let noise = ((state >> 33) % span as u64) as i32 - noise_amp as i32;
            img.set(x, y, (base + noise).clamp(0, 255) as u8);
        }
    }
    img
}

fn lcg_next(state: u64) -> u64 {
    state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}
