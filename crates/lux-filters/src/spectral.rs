//! Frequency-domain stand-ins.
//!
//! None of these computes a real spectral transform. They are coarse
//! spatial-domain approximations shipped under these names, and their
//! visible output is part of the pipeline's compatibility surface, so a
//! faithful FFT/DCT/wavelet must not be swapped in silently.

use lux_core::RasterBuffer;

use crate::blur::{high_pass, sharpen};
use crate::edge::laplacian;

/// "DFT" stand-in: a fixed high-pass response
/// (`original - blurred + 128`), not a Fourier transform.
pub fn dft(src: &RasterBuffer) -> RasterBuffer {
    high_pass(src, 9, 2.0)
}

/// "DCT" stand-in: the 3×3 sharpen kernel, not a cosine transform.
pub fn dct(src: &RasterBuffer) -> RasterBuffer {
    sharpen(src, 1.0)
}

/// "Wavelet" stand-in: the absolute Laplacian response, not a wavelet
/// decomposition.
pub fn wavelet(src: &RasterBuffer) -> RasterBuffer {
    laplacian(src)
}
