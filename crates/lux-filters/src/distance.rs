//! Chamfer distance transform.
//!
//! Two-pass integer propagation over the luminance plane. Pixels whose
//! luminance falls below `low_threshold` are seeds at distance zero; every
//! other pixel receives the city-block distance to the nearest seed. The
//! forward pass takes `min(top, left) + 1`, the backward pass
//! `min(bottom, right) + 1`, and the field is normalized to `[0, 255]` by
//! the maximum finite distance found. An image with no seed pixel has no
//! finite field to normalize and maps to all-zero.

use lux_core::{RasterBuffer, clamp_u8, luminance_u8};

/// Unreached-pixel sentinel. `u32::MAX` would wrap under the `+ 1`
/// propagation step.
const FAR: u32 = u32::MAX / 2;

/// Two-pass chamfer distance on the mask `luminance < low_threshold`.
pub fn distance_transform(src: &RasterBuffer, low_threshold: u8) -> RasterBuffer {
    let w = src.width() as usize;
    let h = src.height() as usize;

    let mut dist: Vec<u32> = src
        .data()
        .chunks_exact(4)
        .map(|px| {
            if luminance_u8(px[0], px[1], px[2]) < low_threshold {
                0
            } else {
                FAR
            }
        })
        .collect();

    // Forward: top and left neighbors
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let mut best = dist[i];
            if y > 0 {
                best = best.min(dist[i - w] + 1);
            }
            if x > 0 {
                best = best.min(dist[i - 1] + 1);
            }
            dist[i] = best;
        }
    }

    // Backward: bottom and right neighbors
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let i = y * w + x;
            let mut best = dist[i];
            if y + 1 < h {
                best = best.min(dist[i + w] + 1);
            }
            if x + 1 < w {
                best = best.min(dist[i + 1] + 1);
            }
            dist[i] = best;
        }
    }

    let max = dist.iter().copied().filter(|&d| d < FAR).max().unwrap_or(0);

    let mut out = Vec::with_capacity(src.data().len());
    for &d in &dist {
        let v = if max == 0 || d >= FAR {
            0
        } else {
            clamp_u8(d as f32 / max as f32 * 255.0)
        };
        out.extend_from_slice(&[v, v, v, 255]);
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_seed_distance_grows_with_range() {
        // One dark pixel in a bright field: distance grows away from it
        let mut img = RasterBuffer::filled(7, 7, [255, 255, 255, 255]);
        img.set_pixel(3, 3, [0, 0, 0, 255]).unwrap();
        let out = distance_transform(&img, 128);

        assert_eq!(out.pixel(3, 3).unwrap()[0], 0);
        let near = out.pixel(4, 3).unwrap()[0];
        let far = out.pixel(6, 3).unwrap()[0];
        assert!(near > 0);
        assert!(far > near);
        // The farthest pixel carries the maximum, normalized to 255
        assert_eq!(out.pixel(0, 0).unwrap()[0], 255);
    }

    #[test]
    fn test_city_block_metric() {
        let mut img = RasterBuffer::filled(5, 5, [255, 255, 255, 255]);
        img.set_pixel(0, 0, [0, 0, 0, 255]).unwrap();
        let out = distance_transform(&img, 128);
        // Distance at (x, y) is x + y; max is 8 at (4, 4)
        let d = |x: u32, y: u32| out.pixel(x, y).unwrap()[0] as f32;
        assert_eq!(d(4, 4), 255.0);
        assert!((d(2, 2) - (4.0 / 8.0 * 255.0)).abs() <= 1.0);
        assert!((d(1, 0) - (1.0 / 8.0 * 255.0)).abs() <= 1.0);
    }

    #[test]
    fn test_no_seed_is_all_zero() {
        let img = RasterBuffer::filled(4, 4, [255, 255, 255, 255]);
        let out = distance_transform(&img, 10);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y).unwrap()[0], 0);
            }
        }
    }

    #[test]
    fn test_all_seeds_is_all_zero() {
        let img = RasterBuffer::filled(4, 4, [0, 0, 0, 255]);
        let out = distance_transform(&img, 10);
        assert_eq!(out.pixel(2, 2).unwrap(), [0, 0, 0, 255]);
    }
}
