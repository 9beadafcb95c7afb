//! Convolution kernels and the generic convolution engine.
//!
//! # Boundary policy
//!
//! For each output pixel the convolution sums only over kernel taps whose
//! source coordinate lies inside the image; out-of-range taps contribute
//! nothing and the sum is **not** renormalized. This is mathematically
//! zero-padding, not "average of valid taps", and it is a compatibility
//! contract: edge pixels of every convolution-based filter must match the
//! reference output byte-for-byte, darkened borders included.
//!
//! Morphology and the windowed histogram/rank filters deliberately use a
//! different policy (edge replication); see their modules.
//!
//! # Kernels
//!
//! - [`Kernel::gaussian`] - normalized Gaussian (sums to 1)
//! - [`Kernel::box_filter`] - uniform average
//! - [`Kernel::sharpen`] - Laplacian-weighted identity boost
//! - [`Kernel::laplacian_of_gaussian`] - zero-mean LoG
//! - [`Kernel::gabor`] - oriented Gaussian-modulated sinusoid
//!
//! # Example
//!
//! ```rust
//! use lux_core::RasterBuffer;
//! use lux_filters::kernel::{Kernel, convolve_rgb};
//!
//! let src = RasterBuffer::filled(16, 16, [128, 128, 128, 255]);
//! let blurred = convolve_rgb(&src, &Kernel::gaussian(5, 1.0));
//! // Interior pixels of a constant field are unchanged
//! assert_eq!(blurred.pixel(8, 8).unwrap(), [128, 128, 128, 255]);
//! ```

use lux_core::{RasterBuffer, clamp_u8};
use tracing::trace;

use crate::step::LawsVector;

/// Square convolution kernel with odd side length.
#[derive(Debug, Clone)]
pub struct Kernel {
    /// Kernel weights, row-major.
    pub data: Vec<f32>,
    /// Side length (odd).
    pub size: usize,
}

impl Kernel {
    /// Creates a kernel from raw weights.
    ///
    /// `size` must be odd and `data.len()` must equal `size * size`;
    /// this is an internal constructor, so both hold by construction at
    /// every call site.
    fn from_data(data: Vec<f32>, size: usize) -> Self {
        debug_assert!(size % 2 == 1);
        debug_assert_eq!(data.len(), size * size);
        Self { data, size }
    }

    /// Creates a normalized Gaussian kernel (weights sum to 1).
    pub fn gaussian(size: u32, sigma: f32) -> Self {
        let size = size as usize;
        let half = (size / 2) as i32;
        let sigma2 = 2.0 * sigma * sigma;

        let mut data = Vec::with_capacity(size * size);
        let mut sum = 0.0f32;
        for y in -half..=half {
            for x in -half..=half {
                let d = (x * x + y * y) as f32;
                let w = (-d / sigma2).exp();
                data.push(w);
                sum += w;
            }
        }
        for w in &mut data {
            *w /= sum;
        }
        Self::from_data(data, size)
    }

    /// Creates a uniform box kernel (each weight 1/size²).
    pub fn box_filter(size: u32) -> Self {
        let size = size as usize;
        let count = size * size;
        Self::from_data(vec![1.0 / count as f32; count], size)
    }

    /// Creates a 3×3 sharpening kernel.
    ///
    /// Identity plus `amount` times the 4-neighbor Laplacian; weights sum
    /// to 1, so flat regions pass through unchanged.
    pub fn sharpen(amount: f32) -> Self {
        let center = 1.0 + 4.0 * amount;
        Self::from_data(
            vec![
                0.0, -amount, 0.0,
                -amount, center, -amount,
                0.0, -amount, 0.0,
            ],
            3,
        )
    }

    /// Creates a zero-mean Laplacian-of-Gaussian kernel.
    pub fn laplacian_of_gaussian(size: u32, sigma: f32) -> Self {
        let size = size as usize;
        let half = (size / 2) as i32;
        let sigma2 = sigma * sigma;

        let mut data = Vec::with_capacity(size * size);
        for y in -half..=half {
            for x in -half..=half {
                let r2 = (x * x + y * y) as f32;
                let norm = r2 / (2.0 * sigma2);
                let w = -(1.0 - norm) * (-norm).exp() / (std::f32::consts::PI * sigma2 * sigma2);
                data.push(w);
            }
        }
        // Shift to exactly zero mean so constant regions map to zero
        let mean = data.iter().sum::<f32>() / data.len() as f32;
        for w in &mut data {
            *w -= mean;
        }
        Self::from_data(data, size)
    }

    /// Creates a Gabor kernel: a sinusoid oriented at `theta`, modulated
    /// by a Gaussian envelope.
    ///
    /// `lambda` is the sinusoid wavelength, `gamma` the envelope aspect
    /// ratio, `psi` the phase offset.
    pub fn gabor(size: u32, sigma: f32, theta: f32, lambda: f32, gamma: f32, psi: f32) -> Self {
        let size = size as usize;
        let half = (size / 2) as i32;
        let sigma2 = 2.0 * sigma * sigma;
        let gamma2 = gamma * gamma;
        let (sin_t, cos_t) = theta.sin_cos();

        let mut data = Vec::with_capacity(size * size);
        for y in -half..=half {
            for x in -half..=half {
                let xf = x as f32;
                let yf = y as f32;
                let xr = xf * cos_t + yf * sin_t;
                let yr = -xf * sin_t + yf * cos_t;
                let envelope = (-(xr * xr + gamma2 * yr * yr) / sigma2).exp();
                let carrier = (2.0 * std::f32::consts::PI * xr / lambda + psi).cos();
                data.push(envelope * carrier);
            }
        }
        Self::from_data(data, size)
    }

    /// Creates a 5×5 Laws texture kernel as the outer product of two 1-D
    /// vectors (`vertical` ⊗ `horizontal`).
    pub fn laws(vertical: LawsVector, horizontal: LawsVector) -> Self {
        let v = vertical.taps();
        let h = horizontal.taps();
        let mut data = Vec::with_capacity(25);
        for vy in v {
            for hx in h {
                data.push(vy * hx);
            }
        }
        Self::from_data(data, 5)
    }

    /// Kernel radius (half the side length).
    #[inline]
    pub fn radius(&self) -> i32 {
        (self.size / 2) as i32
    }
}

/// Convolves R, G and B independently; alpha is copied from the source.
///
/// Channel sums are clamped into `[0, 255]`. Out-of-range taps contribute
/// nothing (see the module docs for why this is load-bearing).
pub fn convolve_rgb(src: &RasterBuffer, kernel: &Kernel) -> RasterBuffer {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel = kernel.size,
        "convolve_rgb"
    );

    let width = src.width() as i32;
    let height = src.height() as i32;
    let data = src.data();
    let radius = kernel.radius();

    let mut out = Vec::with_capacity(data.len());
    for y in 0..height {
        for x in 0..width {
            let mut sums = [0.0f32; 3];
            for ky in -radius..=radius {
                let sy = y + ky;
                if sy < 0 || sy >= height {
                    continue;
                }
                for kx in -radius..=radius {
                    let sx = x + kx;
                    if sx < 0 || sx >= width {
                        continue;
                    }
                    let w = kernel.data
                        [((ky + radius) * kernel.size as i32 + (kx + radius)) as usize];
                    let i = ((sy * width + sx) * 4) as usize;
                    sums[0] += data[i] as f32 * w;
                    sums[1] += data[i + 1] as f32 * w;
                    sums[2] += data[i + 2] as f32 * w;
                }
            }
            let i = ((y * width + x) * 4) as usize;
            out.push(clamp_u8(sums[0]));
            out.push(clamp_u8(sums[1]));
            out.push(clamp_u8(sums[2]));
            out.push(data[i + 3]);
        }
    }

    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

/// Convolves a single float plane with zero-padding, returning raw
/// (unclamped) responses.
///
/// Used by the edge, texture and spectral filters, which need signed
/// responses before taking magnitudes or detecting sign changes.
pub fn convolve_plane(plane: &[f32], width: u32, height: u32, kernel: &Kernel) -> Vec<f32> {
    let w = width as i32;
    let h = height as i32;
    let radius = kernel.radius();

    let mut out = vec![0.0f32; plane.len()];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for ky in -radius..=radius {
                let sy = y + ky;
                if sy < 0 || sy >= h {
                    continue;
                }
                for kx in -radius..=radius {
                    let sx = x + kx;
                    if sx < 0 || sx >= w {
                        continue;
                    }
                    let kw = kernel.data
                        [((ky + radius) * kernel.size as i32 + (kx + radius)) as usize];
                    sum += plane[(sy * w + sx) as usize] * kw;
                }
            }
            out[(y * w + x) as usize] = sum;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_sums_to_one() {
        for (size, sigma) in [(3, 0.8), (5, 1.0), (9, 2.5)] {
            let k = Kernel::gaussian(size, sigma);
            let sum: f32 = k.data.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_gaussian_center_is_peak() {
        let k = Kernel::gaussian(5, 1.0);
        let center = k.data[12];
        assert!(center > k.data[0]);
        assert!(center > k.data[2]);
    }

    #[test]
    fn test_box_is_uniform() {
        let k = Kernel::box_filter(3);
        for w in &k.data {
            assert_relative_eq!(*w, 1.0 / 9.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sharpen_sums_to_one() {
        let k = Kernel::sharpen(1.5);
        let sum: f32 = k.data.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_log_is_zero_mean() {
        let k = Kernel::laplacian_of_gaussian(9, 1.4);
        let sum: f32 = k.data.iter().sum();
        assert_relative_eq!(sum, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_laws_outer_product() {
        let k = Kernel::laws(LawsVector::L5, LawsVector::E5);
        assert_eq!(k.size, 5);
        // data[row][col] = L5[row] * E5[col]
        assert_relative_eq!(k.data[0], 1.0 * -1.0);
        assert_relative_eq!(k.data[6], 4.0 * -2.0);
    }

    #[test]
    fn test_convolve_constant_interior() {
        let src = RasterBuffer::filled(8, 8, [100, 100, 100, 200]);
        let out = convolve_rgb(&src, &Kernel::gaussian(3, 1.0));
        // Interior pixel: kernel fully inside, constant reproduced
        let px = out.pixel(4, 4).unwrap();
        assert_eq!(px[0], 100);
        // Alpha copied from source, not convolved
        assert_eq!(px[3], 200);
    }

    #[test]
    fn test_convolve_zero_padding_darkens_corner() {
        // Zero-padding: the corner loses the taps that fall outside,
        // so a constant field dims at the border instead of holding
        let src = RasterBuffer::filled(8, 8, [100, 100, 100, 255]);
        let out = convolve_rgb(&src, &Kernel::box_filter(3));
        let corner = out.pixel(0, 0).unwrap();
        // 4 of 9 taps in range: 100 * 4/9 ≈ 44
        assert_eq!(corner[0], 44);
    }

    #[test]
    fn test_convolve_plane_matches_manual() {
        let plane = vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let k = Kernel::box_filter(3);
        let out = convolve_plane(&plane, 3, 3, &k);
        // Center: sum of all nine taps * 1/9 = 3/9
        assert_relative_eq!(out[4], 3.0 / 9.0, epsilon = 1e-6);
    }
}
