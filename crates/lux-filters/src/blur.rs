//! Blur and sharpening filters built on the convolution engine.

use lux_core::{RasterBuffer, clamp_u8};

use crate::kernel::{Kernel, convolve_rgb};

/// Gaussian blur with a normalized kernel.
pub fn gaussian_blur(src: &RasterBuffer, kernel_size: u32, sigma: f32) -> RasterBuffer {
    convolve_rgb(src, &Kernel::gaussian(kernel_size, sigma))
}

/// Uniform box blur.
pub fn box_blur(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    convolve_rgb(src, &Kernel::box_filter(kernel_size))
}

/// 3×3 Laplacian-boost sharpening.
pub fn sharpen(src: &RasterBuffer, amount: f32) -> RasterBuffer {
    convolve_rgb(src, &Kernel::sharpen(amount))
}

/// Unsharp mask: `original + amount * (original - blurred)`, clamped per
/// channel. Alpha preserved.
pub fn unsharp_mask(src: &RasterBuffer, kernel_size: u32, sigma: f32, amount: f32) -> RasterBuffer {
    let blurred = gaussian_blur(src, kernel_size, sigma);

    let mut out = Vec::with_capacity(src.data().len());
    for (orig, blur) in src
        .data()
        .chunks_exact(4)
        .zip(blurred.data().chunks_exact(4))
    {
        for c in 0..3 {
            let o = orig[c] as f32;
            let b = blur[c] as f32;
            out.push(clamp_u8(o + amount * (o - b)));
        }
        out.push(orig[3]);
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

/// High-pass response: `original - blurred + 128` per channel.
///
/// Not a chain filter kind of its own; the spectral stand-ins reuse it.
pub fn high_pass(src: &RasterBuffer, kernel_size: u32, sigma: f32) -> RasterBuffer {
    let blurred = gaussian_blur(src, kernel_size, sigma);

    let mut out = Vec::with_capacity(src.data().len());
    for (orig, blur) in src
        .data()
        .chunks_exact(4)
        .zip(blurred.data().chunks_exact(4))
    {
        for c in 0..3 {
            out.push(clamp_u8(orig[c] as f32 - blur[c] as f32 + 128.0));
        }
        out.push(orig[3]);
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}
