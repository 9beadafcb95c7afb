//! Texture measures: Laws' texture energy and local binary patterns.

use lux_core::{RasterBuffer, clamp_u8, luminance_u8};

use crate::kernel::{Kernel, convolve_plane};
use crate::step::LawsVector;

/// Laws' texture energy.
///
/// Convolves the luminance plane with the 5×5 outer-product kernel
/// `vector1 ⊗ vector2`, then replaces each response with the mean absolute
/// response over an `energy_window` (edge-replicated), and normalizes the
/// energy map to its observed maximum.
pub fn laws_texture_energy(
    src: &RasterBuffer,
    vector1: LawsVector,
    vector2: LawsVector,
    energy_window: u32,
) -> RasterBuffer {
    let w = src.width() as i32;
    let h = src.height() as i32;
    let plane = src.luminance_plane();
    let resp = convolve_plane(
        &plane,
        src.width(),
        src.height(),
        &Kernel::laws(vector1, vector2),
    );

    let radius = (energy_window / 2) as i32;
    let window_area = (energy_window * energy_window) as f32;
    let mut energy = vec![0.0f32; resp.len()];
    let mut max = 0.0f32;
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for ky in -radius..=radius {
                let sy = (y + ky).clamp(0, h - 1);
                for kx in -radius..=radius {
                    let sx = (x + kx).clamp(0, w - 1);
                    sum += resp[(sy * w + sx) as usize].abs();
                }
            }
            let e = sum / window_area;
            energy[(y * w + x) as usize] = e;
            max = max.max(e);
        }
    }

    let mut out = Vec::with_capacity(src.data().len());
    for &e in &energy {
        let v = if max > 0.0 {
            clamp_u8(e / max * 255.0)
        } else {
            0
        };
        out.extend_from_slice(&[v, v, v, 255]);
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}

/// Local binary pattern codes over the 8-neighborhood.
///
/// For each interior pixel, neighbors with luminance greater than or equal
/// to the center set one bit of an 8-bit code, starting at the top-left
/// neighbor (most significant bit) and proceeding clockwise. The 1-pixel
/// border is left unprocessed; its source pixels are copied through.
pub fn local_binary_pattern(src: &RasterBuffer) -> RasterBuffer {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let plane: Vec<u8> = src
        .data()
        .chunks_exact(4)
        .map(|px| luminance_u8(px[0], px[1], px[2]))
        .collect();

    // Clockwise from top-left, MSB first
    const NEIGHBORS: [(i32, i32); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
    ];

    let mut out = src.data().to_vec();
    if w < 3 || h < 3 {
        return RasterBuffer::from_data(src.width(), src.height(), out)
            .expect("output length matches input by construction");
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let center = plane[y * w + x];
            let mut code = 0u8;
            for (bit, (dx, dy)) in NEIGHBORS.iter().enumerate() {
                let nx = (x as i32 + dx) as usize;
                let ny = (y as i32 + dy) as usize;
                if plane[ny * w + nx] >= center {
                    code |= 1 << (7 - bit);
                }
            }
            let i = (y * w + x) * 4;
            out[i] = code;
            out[i + 1] = code;
            out[i + 2] = code;
            // out[i + 3] keeps the source alpha
        }
    }
    RasterBuffer::from_data(src.width(), src.height(), out)
        .expect("output length matches input by construction")
}
