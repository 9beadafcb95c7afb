//! Edge-preserving guided filter, guidance = the image itself.
//!
//! The linear local model per window: `a = cov(I, p) / (var(I) + ε)` and
//! `b = mean(p) - a * mean(I)`. With the image as its own guidance,
//! `cov(I, p) = var(I)`, so `a = var / (var + ε)` and `b = mean * (1 - a)`.
//! The output is `mean(a) * I + mean(b)`, with every window mean computed
//! through an integral image, making each box mean O(1) per pixel
//! regardless of radius.
//!
//! Channels are filtered independently in normalized `[0, 1]` space, which
//! is the domain `epsilon` is specified in; alpha passes through.

use lux_core::{RasterBuffer, clamp_u8};

/// Summed-area table with an O(1) clamped-window mean.
struct Integral {
    /// (w + 1) × (h + 1) prefix sums; row 0 and column 0 are zero.
    sums: Vec<f64>,
    w: usize,
    h: usize,
}

impl Integral {
    fn build(plane: &[f32], w: usize, h: usize) -> Self {
        let stride = w + 1;
        let mut sums = vec![0.0f64; stride * (h + 1)];
        for y in 0..h {
            let mut row = 0.0f64;
            for x in 0..w {
                row += plane[y * w + x] as f64;
                sums[(y + 1) * stride + (x + 1)] = sums[y * stride + (x + 1)] + row;
            }
        }
        Self { sums, w, h }
    }

    /// Mean over the window of `radius` around (x, y), intersected with
    /// the image bounds and divided by the actual tap count.
    fn box_mean(&self, x: usize, y: usize, radius: usize) -> f32 {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius + 1).min(self.w);
        let y1 = (y + radius + 1).min(self.h);
        let stride = self.w + 1;

        let sum = self.sums[y1 * stride + x1] - self.sums[y0 * stride + x1]
            - self.sums[y1 * stride + x0]
            + self.sums[y0 * stride + x0];
        let count = ((x1 - x0) * (y1 - y0)) as f64;
        (sum / count) as f32
    }
}

/// Self-guided edge-preserving smoothing.
pub fn guided_filter(src: &RasterBuffer, radius: u32, epsilon: f32) -> RasterBuffer {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let r = radius as usize;
    let data = src.data();
    let count = w * h;

    let mut out = data.to_vec();
    for c in 0..3 {
        let plane: Vec<f32> = (0..count).map(|i| data[i * 4 + c] as f32 / 255.0).collect();
        let squared: Vec<f32> = plane.iter().map(|v| v * v).collect();

        let int_i = Integral::build(&plane, w, h);
        let int_ii = Integral::build(&squared, w, h);

        let mut a = vec![0.0f32; count];
        let mut b = vec![0.0f32; count];
        for y in 0..h {
            for x in 0..w {
                let mean = int_i.box_mean(x, y, r);
                let corr = int_ii.box_mean(x, y, r);
                let var = (corr - mean * mean).max(0.0);
                let ai = var / (var + epsilon);
                a[y * w + x] = ai;
                b[y * w + x] = mean * (1.0 - ai);
            }
        }

        let int_a = Integral::build(&a, w, h);
        let int_b = Integral::build(&b, w, h);
        for y in 0..h {
            for x in 0..w {
                let q = int_a.box_mean(x, y, r) * plane[y * w + x] + int_b.box_mean(x, y, r);
                out[(y * w + x) * 4 + c] = clamp_u8(q * 255.0);
            }
        }
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integral_box_mean_constant() {
        let plane = vec![3.0f32; 6 * 4];
        let int = Integral::build(&plane, 6, 4);
        assert_relative_eq!(int.box_mean(0, 0, 2), 3.0, epsilon = 1e-6);
        assert_relative_eq!(int.box_mean(3, 2, 1), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_integral_box_mean_manual() {
        // 3x3 ramp 0..9, full-image window mean = 4
        let plane: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let int = Integral::build(&plane, 3, 3);
        assert_relative_eq!(int.box_mean(1, 1, 1), 4.0, epsilon = 1e-6);
        // Top-left 2x2 window: (0 + 1 + 3 + 4) / 4
        assert_relative_eq!(int.box_mean(0, 0, 1), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_guided_flat_field_unchanged() {
        // var = 0 everywhere, so a = 0, b = mean, output = mean = input
        let img = RasterBuffer::filled(10, 10, [130, 130, 130, 200]);
        let out = guided_filter(&img, 3, 0.01);
        assert_eq!(out.pixel(5, 5).unwrap(), [130, 130, 130, 200]);
        assert_eq!(out.pixel(0, 0).unwrap(), [130, 130, 130, 200]);
    }

    #[test]
    fn test_guided_smooths_noise_keeps_edge() {
        let mut img = RasterBuffer::filled(16, 16, [40, 40, 40, 255]);
        for y in 0..16 {
            for x in 8..16 {
                img.set_pixel(x, y, [220, 220, 220, 255]).unwrap();
            }
        }
        // A lone speck inside the dark half
        img.set_pixel(3, 8, [90, 90, 90, 255]).unwrap();
        let out = guided_filter(&img, 2, 0.05);

        // Speck pulled toward its neighborhood
        assert!(out.pixel(3, 8).unwrap()[0] < 90);
        // Step edge survives: the two sides stay far apart
        let dark = out.pixel(5, 4).unwrap()[0] as i32;
        let bright = out.pixel(10, 4).unwrap()[0] as i32;
        assert!(bright - dark > 100);
    }

    #[test]
    fn test_guided_larger_epsilon_smooths_more() {
        let mut img = RasterBuffer::filled(12, 12, [60, 60, 60, 255]);
        img.set_pixel(6, 6, [200, 200, 200, 255]).unwrap();
        let gentle = guided_filter(&img, 3, 0.001);
        let strong = guided_filter(&img, 3, 0.5);
        // Larger epsilon pushes a -> 0: output closer to the local mean
        assert!(strong.pixel(6, 6).unwrap()[0] < gentle.pixel(6, 6).unwrap()[0]);
    }
}
