//! Point operations: grayscale, invert, gamma.

use lux_core::{RasterBuffer, clamp_u8, luminance_u8};

/// Converts to grayscale: R=G=B=BT.601 luminance, alpha preserved.
///
/// Idempotent - a gray pixel's luminance is its own value.
pub fn grayscale(src: &RasterBuffer) -> RasterBuffer {
    map_pixels(src, |px| {
        let l = luminance_u8(px[0], px[1], px[2]);
        [l, l, l, px[3]]
    })
}

/// Inverts R, G and B; alpha preserved. Self-inverse.
pub fn invert(src: &RasterBuffer) -> RasterBuffer {
    map_pixels(src, |px| [255 - px[0], 255 - px[1], 255 - px[2], px[3]])
}

/// Gamma correction through a 256-entry LUT: `pow(i/255, 1/gamma) * 255`.
pub fn gamma(src: &RasterBuffer, gamma: f32) -> RasterBuffer {
    let inv = 1.0 / gamma;
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = clamp_u8((i as f32 / 255.0).powf(inv) * 255.0);
    }
    map_pixels(src, |px| {
        [
            lut[px[0] as usize],
            lut[px[1] as usize],
            lut[px[2] as usize],
            px[3],
        ]
    })
}

/// Applies a per-pixel map, producing a new buffer.
fn map_pixels(src: &RasterBuffer, f: impl Fn([u8; 4]) -> [u8; 4]) -> RasterBuffer {
    let mut out = Vec::with_capacity(src.data().len());
    for px in src.data().chunks_exact(4) {
        let mapped = f([px[0], px[1], px[2], px[3]]);
        out.extend_from_slice(&mapped);
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}
