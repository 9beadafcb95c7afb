//! Grayscale morphology: erode, dilate, and the operators derived from
//! them.
//!
//! The structuring element is a square window. Unlike the convolution
//! engine, the border is edge-replicated: out-of-range taps clamp to the
//! nearest edge pixel, so the min/max is always taken over a full window.
//! R, G and B are processed independently; alpha passes through.

use lux_core::RasterBuffer;

/// Min/max over a square window per channel, edge-replicated border.
fn morphology_op(src: &RasterBuffer, kernel_size: u32, is_dilate: bool) -> RasterBuffer {
    let w = src.width() as i32;
    let h = src.height() as i32;
    let radius = (kernel_size / 2) as i32;
    let data = src.data();

    let mut out = Vec::with_capacity(data.len());
    for y in 0..h {
        for x in 0..w {
            let mut acc = if is_dilate { [0u8; 3] } else { [255u8; 3] };
            for ky in -radius..=radius {
                let sy = (y + ky).clamp(0, h - 1);
                for kx in -radius..=radius {
                    let sx = (x + kx).clamp(0, w - 1);
                    let i = ((sy * w + sx) * 4) as usize;
                    for (c, a) in acc.iter_mut().enumerate() {
                        let v = data[i + c];
                        *a = if is_dilate { (*a).max(v) } else { (*a).min(v) };
                    }
                }
            }
            let i = ((y * w + x) * 4) as usize;
            out.extend_from_slice(&[acc[0], acc[1], acc[2], data[i + 3]]);
        }
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

/// Per-channel saturating difference `a - b`; alpha taken from `a`.
fn channel_diff(a: &RasterBuffer, b: &RasterBuffer) -> RasterBuffer {
    let mut out = Vec::with_capacity(a.data().len());
    for (pa, pb) in a.data().chunks_exact(4).zip(b.data().chunks_exact(4)) {
        out.push(pa[0].saturating_sub(pb[0]));
        out.push(pa[1].saturating_sub(pb[1]));
        out.push(pa[2].saturating_sub(pb[2]));
        out.push(pa[3]);
    }
    RasterBuffer::from_data(a.width(), a.height(), out)
        .expect("output length matches input by construction")
}

/// Erosion: per-pixel minimum over the window. Shrinks bright regions.
pub fn erode(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    morphology_op(src, kernel_size, false)
}

/// Dilation: per-pixel maximum over the window. Expands bright regions.
pub fn dilate(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    morphology_op(src, kernel_size, true)
}

/// Opening: erode then dilate. Removes small bright specks.
pub fn open(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    dilate(&erode(src, kernel_size), kernel_size)
}

/// Closing: dilate then erode. Fills small dark gaps.
pub fn close(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    erode(&dilate(src, kernel_size), kernel_size)
}

/// Top-hat: source minus opening. Isolates bright detail smaller than the
/// window.
pub fn top_hat(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    channel_diff(src, &open(src, kernel_size))
}

/// Black-hat: closing minus source. Isolates dark detail smaller than the
/// window.
pub fn black_hat(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    channel_diff(&close(src, kernel_size), src)
}

/// Morphological gradient: dilation minus erosion. Highlights boundaries.
pub fn morph_gradient(src: &RasterBuffer, kernel_size: u32) -> RasterBuffer {
    channel_diff(&dilate(src, kernel_size), &erode(src, kernel_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 binary checkerboard, (0,0) dark.
    fn checkerboard() -> RasterBuffer {
        let mut img = RasterBuffer::filled(4, 4, [0, 0, 0, 255]);
        for y in 0..4 {
            for x in 0..4 {
                if (x + y) % 2 == 1 {
                    img.set_pixel(x, y, [255, 255, 255, 255]).unwrap();
                }
            }
        }
        img
    }

    #[test]
    fn test_erode_checkerboard_matches_window_min() {
        let img = checkerboard();
        let out = erode(&img, 3);
        // Every pixel equals the min of its clamped 3x3 neighborhood,
        // which for an alternating pattern always contains a 0
        for y in 0..4i32 {
            for x in 0..4i32 {
                let mut expect = 255u8;
                for ky in -1..=1 {
                    for kx in -1..=1 {
                        let sx = (x + kx).clamp(0, 3) as u32;
                        let sy = (y + ky).clamp(0, 3) as u32;
                        expect = expect.min(img.pixel(sx, sy).unwrap()[0]);
                    }
                }
                assert_eq!(out.pixel(x as u32, y as u32).unwrap()[0], expect);
                assert_eq!(expect, 0);
            }
        }
    }

    #[test]
    fn test_dilate_grows_bright_pixel() {
        let mut img = RasterBuffer::filled(5, 5, [0, 0, 0, 255]);
        img.set_pixel(2, 2, [255, 255, 255, 255]).unwrap();
        let out = dilate(&img, 3);
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(out.pixel(x, y).unwrap()[0], 255);
            }
        }
        assert_eq!(out.pixel(0, 0).unwrap()[0], 0);
    }

    #[test]
    fn test_open_removes_speck() {
        let mut img = RasterBuffer::filled(7, 7, [0, 0, 0, 255]);
        img.set_pixel(3, 3, [255, 255, 255, 255]).unwrap();
        let out = open(&img, 3);
        assert_eq!(out.pixel(3, 3).unwrap()[0], 0);
    }

    #[test]
    fn test_close_fills_hole() {
        let mut img = RasterBuffer::filled(7, 7, [200, 200, 200, 255]);
        img.set_pixel(3, 3, [0, 0, 0, 255]).unwrap();
        let out = close(&img, 3);
        assert_eq!(out.pixel(3, 3).unwrap()[0], 200);
    }

    #[test]
    fn test_hats_are_zero_on_flat_field() {
        let img = RasterBuffer::filled(6, 6, [120, 120, 120, 255]);
        let th = top_hat(&img, 3);
        let bh = black_hat(&img, 3);
        let gr = morph_gradient(&img, 3);
        for out in [th, bh, gr] {
            assert_eq!(out.pixel(3, 3).unwrap()[0], 0);
            // Alpha preserved through the difference
            assert_eq!(out.pixel(3, 3).unwrap()[3], 255);
        }
    }

    #[test]
    fn test_top_hat_isolates_speck() {
        let mut img = RasterBuffer::filled(7, 7, [50, 50, 50, 255]);
        img.set_pixel(3, 3, [250, 250, 250, 255]).unwrap();
        let out = top_hat(&img, 3);
        assert_eq!(out.pixel(3, 3).unwrap()[0], 200);
        assert_eq!(out.pixel(0, 0).unwrap()[0], 0);
    }

    #[test]
    fn test_gradient_marks_boundary() {
        let mut img = RasterBuffer::filled(8, 8, [0, 0, 0, 255]);
        for y in 0..8 {
            for x in 4..8 {
                img.set_pixel(x, y, [255, 255, 255, 255]).unwrap();
            }
        }
        let out = morph_gradient(&img, 3);
        assert_eq!(out.pixel(4, 4).unwrap()[0], 255);
        assert_eq!(out.pixel(1, 4).unwrap()[0], 0);
        assert_eq!(out.pixel(7, 4).unwrap()[0], 0);
    }
}
