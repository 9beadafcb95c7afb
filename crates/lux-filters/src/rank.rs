//! Rank-order filters: median, weighted median, alpha-trimmed mean.
//!
//! All three compute their statistic over a square window of BT.601
//! luminance values (edge-replicated at the border, like the other
//! windowed filters) and write it back as a gray RGB triple; alpha is
//! preserved from the source pixel.

use lux_core::{RasterBuffer, clamp_u8};

/// 3×3 binomial-like weight kernel used by the weighted median.
const BINOMIAL_3X3: [u32; 9] = [1, 2, 1, 2, 4, 2, 1, 2, 1];

/// Luminance plane as u8, shared by the rank filters.
fn luma_plane(src: &RasterBuffer) -> Vec<u8> {
    src.data()
        .chunks_exact(4)
        .map(|px| lux_core::luminance_u8(px[0], px[1], px[2]))
        .collect()
}

/// Runs a window statistic over the luminance plane and writes the
/// result as gray, alpha preserved.
fn rank_filter(
    src: &RasterBuffer,
    kernel_size: u32,
    stat: impl Fn(&mut Vec<u8>) -> u8,
) -> RasterBuffer {
    let w = src.width() as i32;
    let h = src.height() as i32;
    let radius = (kernel_size / 2) as i32;
    let plane = luma_plane(src);

    let mut out = Vec::with_capacity(src.data().len());
    let mut window = Vec::with_capacity((kernel_size * kernel_size) as usize);
    for y in 0..h {
        for x in 0..w {
            window.clear();
            for ky in -radius..=radius {
                let sy = (y + ky).clamp(0, h - 1);
                for kx in -radius..=radius {
                    let sx = (x + kx).clamp(0, w - 1);
                    window.push(plane[(sy * w + sx) as usize]);
                }
            }
            let v = stat(&mut window);
            let alpha = src.data()[((y * w + x) * 4 + 3) as usize];
            out.extend_from_slice(&[v, v, v, alpha]);
        }
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

fn median_of(window: &mut Vec<u8>) -> u8 {
    window.sort_unstable();
    window[window.len() / 2]
}

/// Windowed median on luminance.
pub fn median(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    rank_filter(src, kernel_size, median_of)
}

/// Weighted median with a 3×3 binomial weight kernel.
///
/// Each window value is inserted `weight` times before taking the plain
/// median of the expanded list. Any other kernel size falls back to the
/// plain median.
pub fn weighted_median(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    if kernel_size != 3 {
        return median(src, kernel_size);
    }
    rank_filter(src, 3, |window| {
        let mut expanded = Vec::with_capacity(16);
        for (v, w) in window.iter().zip(BINOMIAL_3X3.iter()) {
            for _ in 0..*w {
                expanded.push(*v);
            }
        }
        expanded.sort_unstable();
        expanded[expanded.len() / 2]
    })
}

/// Alpha-trimmed mean: sort the window, trim `round(k² * alpha / 2)`
/// values from each end, average the remainder.
///
/// If trimming would leave nothing, falls back to the plain median.
pub fn alpha_trimmed_mean(src: &RasterBuffer, kernel_size: u32, alpha: f32) -> RasterBuffer {
    let count = (kernel_size * kernel_size) as usize;
    let trim = (count as f32 * alpha / 2.0).round() as usize;

    rank_filter(src, kernel_size, move |window| {
        if 2 * trim >= window.len() {
            return median_of(window);
        }
        window.sort_unstable();
        let kept = &window[trim..window.len() - trim];
        let sum: u32 = kept.iter().map(|&v| v as u32).sum();
        clamp_u8(sum as f32 / kept.len() as f32)
    })
}
