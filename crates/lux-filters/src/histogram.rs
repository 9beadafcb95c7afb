//! Histogram equalization: global, local (per-pixel window), adaptive
//! (tiled), and CLAHE.
//!
//! All four variants build their histograms over BT.601 luminance and
//! remap each of R, G, B through the resulting CDF lookup table; alpha
//! passes through. The CDF-LUT formula is the textbook one:
//!
//! ```text
//! lut[v] = round((cdf[v] - cdf_min) / (n - cdf_min) * 255)
//! ```
//!
//! where `cdf_min` is the first nonzero CDF value. A histogram whose
//! pixels all share one value has `n == cdf_min`; the LUT degenerates to
//! identity rather than dividing by zero.

use lux_core::{RasterBuffer, luminance_u8};

/// Builds the CDF lookup table for one histogram.
fn cdf_lut(hist: &[u32; 256], total: u32) -> [u8; 256] {
    let mut lut = [0u8; 256];

    let mut cdf = 0u32;
    let mut cdf_min = 0u32;
    let mut seen_first = false;
    let mut cdfs = [0u32; 256];
    for (i, &count) in hist.iter().enumerate() {
        cdf += count;
        cdfs[i] = cdf;
        if !seen_first && count > 0 {
            cdf_min = cdf;
            seen_first = true;
        }
    }

    let denom = total.saturating_sub(cdf_min);
    for (i, v) in lut.iter_mut().enumerate() {
        if denom == 0 {
            // Empty or single-valued histogram: identity
            *v = i as u8;
        } else {
            let num = cdfs[i].saturating_sub(cdf_min) as f32;
            *v = (num / denom as f32 * 255.0).round() as u8;
        }
    }
    lut
}

/// The luminance plane rounded to u8, as histogram input.
fn luma_plane(src: &RasterBuffer) -> Vec<u8> {
    src.data()
        .chunks_exact(4)
        .map(|px| luminance_u8(px[0], px[1], px[2]))
        .collect()
}

/// Remaps R, G, B per pixel; alpha preserved.
fn map_rgb(src: &RasterBuffer, f: impl Fn(u32, u32, [u8; 3]) -> [u8; 3]) -> RasterBuffer {
    let mut out = Vec::with_capacity(src.data().len());
    for y in 0..src.height() {
        for x in 0..src.width() {
            let px = src.pixel(x, y).expect("coordinates in range by loop bounds");
            let mapped = f(x, y, [px[0], px[1], px[2]]);
            out.extend_from_slice(&mapped);
            out.push(px[3]);
        }
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

/// Global histogram equalization: one CDF-LUT over the whole image.
pub fn equalize_global(src: &RasterBuffer) -> RasterBuffer {
    let mut hist = [0u32; 256];
    for px in src.data().chunks_exact(4) {
        hist[luminance_u8(px[0], px[1], px[2]) as usize] += 1;
    }
    let lut = cdf_lut(&hist, src.pixel_count() as u32);
    map_rgb(src, |_, _, rgb| rgb.map(|v| lut[v as usize]))
}

/// Local histogram equalization: per-pixel CDF over a clamped window.
///
/// O(pixels · k²); deliberately naive, matching the reference.
pub fn equalize_local(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    let w = src.width() as i32;
    let h = src.height() as i32;
    let radius = (kernel_size / 2) as i32;
    let plane = luma_plane(src);

    map_rgb(src, |x, y, rgb| {
        let mut hist = [0u32; 256];
        let mut count = 0u32;
        for ky in -radius..=radius {
            let sy = (y as i32 + ky).clamp(0, h - 1);
            for kx in -radius..=radius {
                let sx = (x as i32 + kx).clamp(0, w - 1);
                hist[plane[(sy * w + sx) as usize] as usize] += 1;
                count += 1;
            }
        }
        let lut = cdf_lut(&hist, count);
        rgb.map(|v| lut[v as usize])
    })
}

/// Tile grid geometry and per-tile LUTs shared by the adaptive variants.
struct TileLuts {
    luts: Vec<[u8; 256]>,
    tiles: u32,
    tile_w: f32,
    tile_h: f32,
}

impl TileLuts {
    fn build(src: &RasterBuffer, tiles: u32, clip_limit: Option<f32>) -> Self {
        let w = src.width();
        let h = src.height();
        let tile_w = (w as f32 / tiles as f32).ceil().max(1.0);
        let tile_h = (h as f32 / tiles as f32).ceil().max(1.0);
        let plane = luma_plane(src);

        let mut luts = Vec::with_capacity((tiles * tiles) as usize);
        for ty in 0..tiles {
            for tx in 0..tiles {
                let x0 = (tx as f32 * tile_w) as u32;
                let y0 = (ty as f32 * tile_h) as u32;
                let x1 = ((tx + 1) as f32 * tile_w).min(w as f32) as u32;
                let y1 = ((ty + 1) as f32 * tile_h).min(h as f32) as u32;

                let mut hist = [0u32; 256];
                let mut count = 0u32;
                for y in y0..y1 {
                    for x in x0..x1 {
                        hist[plane[(y * w + x) as usize] as usize] += 1;
                        count += 1;
                    }
                }
                if let Some(limit) = clip_limit {
                    clip_and_redistribute(&mut hist, count, limit);
                }
                luts.push(cdf_lut(&hist, count));
            }
        }

        Self {
            luts,
            tiles,
            tile_w,
            tile_h,
        }
    }

    /// Bilinearly blends the four surrounding tile LUTs at value `v`.
    fn sample(&self, x: u32, y: u32, v: u8) -> u8 {
        let gx = x as f32 / self.tile_w - 0.5;
        let gy = y as f32 / self.tile_h - 0.5;
        let max_tile = (self.tiles - 1) as i32;

        let tx0 = (gx.floor() as i32).clamp(0, max_tile);
        let ty0 = (gy.floor() as i32).clamp(0, max_tile);
        let tx1 = (tx0 + 1).min(max_tile);
        let ty1 = (ty0 + 1).min(max_tile);
        let fx = (gx - gx.floor()).clamp(0.0, 1.0);
        let fy = (gy - gy.floor()).clamp(0.0, 1.0);

        let at = |tx: i32, ty: i32| -> f32 {
            self.luts[(ty as u32 * self.tiles + tx as u32) as usize][v as usize] as f32
        };
        let top = at(tx0, ty0) * (1.0 - fx) + at(tx1, ty0) * fx;
        let bottom = at(tx0, ty1) * (1.0 - fx) + at(tx1, ty1) * fx;
        (top * (1.0 - fy) + bottom * fy).round() as u8
    }
}

/// Clips histogram bins at `limit × uniform` and spreads the excess
/// evenly over all bins.
fn clip_and_redistribute(hist: &mut [u32; 256], total: u32, limit: f32) {
    if total == 0 {
        return;
    }
    let cap = ((limit * total as f32 / 256.0).max(1.0)) as u32;
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > cap {
            excess += *bin - cap;
            *bin = cap;
        }
    }
    let share = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += share + if i < remainder { 1 } else { 0 };
    }
}

/// Adaptive histogram equalization: tiled CDFs with bilinear LUT
/// blending. No clip limit.
pub fn equalize_adaptive(src: &RasterBuffer, tiles: u32) -> RasterBuffer {
    let grid = TileLuts::build(src, tiles, None);
    map_rgb(src, |x, y, rgb| rgb.map(|v| grid.sample(x, y, v)))
}

/// CLAHE: adaptive equalization with per-tile clip-limit redistribution
/// before the CDF.
pub fn clahe(src: &RasterBuffer, tiles: u32, clip_limit: f32) -> RasterBuffer {
    let grid = TileLuts::build(src, tiles, Some(clip_limit));
    map_rgb(src, |x, y, rgb| rgb.map(|v| grid.sample(x, y, v)))
}
