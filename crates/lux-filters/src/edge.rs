//! Edge detection: gradient templates, Laplacian variants, and the Canny
//! approximation.
//!
//! All operators here work on the BT.601 luminance plane and emit a gray
//! edge map (R=G=B=magnitude, alpha 255). Responses are computed with the
//! same zero-padding policy as the convolution engine.
//!
//! The Canny implementation is an acknowledged approximation: Sobel
//! magnitude with a hard dual-threshold cut, no non-maximum suppression
//! and no hysteresis. It is weaker than classic Canny and kept that way
//! for output compatibility.

use lux_core::{RasterBuffer, clamp_u8};

use crate::kernel::{Kernel, convolve_plane};

/// Directional 3×3 template pair (Gx, Gy).
struct TemplatePair {
    gx: [f32; 9],
    gy: [f32; 9],
}

const SOBEL: TemplatePair = TemplatePair {
    gx: [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
    gy: [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
};

const PREWITT: TemplatePair = TemplatePair {
    gx: [-1.0, 0.0, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0],
    gy: [-1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
};

const SCHARR: TemplatePair = TemplatePair {
    gx: [-3.0, 0.0, 3.0, -10.0, 0.0, 10.0, -3.0, 0.0, 3.0],
    gy: [-3.0, -10.0, -3.0, 0.0, 0.0, 0.0, 3.0, 10.0, 3.0],
};

/// 4-neighbor Laplacian template.
const LAPLACIAN: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0];

/// Wraps a luminance response plane into a gray RGBA buffer (alpha 255).
fn plane_to_gray(plane: &[f32], width: u32, height: u32) -> RasterBuffer {
    let mut out = Vec::with_capacity(plane.len() * 4);
    for &v in plane {
        let g = clamp_u8(v);
        out.extend_from_slice(&[g, g, g, 255]);
    }
    RasterBuffer::from_data(width, height, out)
        .expect("output length matches input by construction")
}

/// Gradient magnitude √(gx² + gy²) from a 3×3 template pair.
fn gradient_magnitude(src: &RasterBuffer, pair: &TemplatePair) -> RasterBuffer {
    let plane = src.luminance_plane();
    let kx = Kernel {
        data: pair.gx.to_vec(),
        size: 3,
    };
    let ky = Kernel {
        data: pair.gy.to_vec(),
        size: 3,
    };
    let gx = convolve_plane(&plane, src.width(), src.height(), &kx);
    let gy = convolve_plane(&plane, src.width(), src.height(), &ky);

    let mag: Vec<f32> = gx
        .iter()
        .zip(gy.iter())
        .map(|(x, y)| (x * x + y * y).sqrt())
        .collect();
    plane_to_gray(&mag, src.width(), src.height())
}

/// Sobel edge magnitude.
pub fn sobel(src: &RasterBuffer) -> RasterBuffer {
    gradient_magnitude(src, &SOBEL)
}

/// Prewitt edge magnitude.
pub fn prewitt(src: &RasterBuffer) -> RasterBuffer {
    gradient_magnitude(src, &PREWITT)
}

/// Scharr edge magnitude.
pub fn scharr(src: &RasterBuffer) -> RasterBuffer {
    gradient_magnitude(src, &SCHARR)
}

/// Roberts cross edge magnitude.
///
/// The 2×2 templates pair each pixel with its diagonal neighbors;
/// missing neighbors at the right/bottom border contribute zero.
pub fn roberts(src: &RasterBuffer) -> RasterBuffer {
    let plane = src.luminance_plane();
    let w = src.width() as usize;
    let h = src.height() as usize;

    let at = |x: usize, y: usize| -> f32 {
        if x < w && y < h { plane[y * w + x] } else { 0.0 }
    };

    let mut mag = vec![0.0f32; plane.len()];
    for y in 0..h {
        for x in 0..w {
            let gx = at(x, y) - at(x + 1, y + 1);
            let gy = at(x + 1, y) - at(x, y + 1);
            mag[y * w + x] = (gx * gx + gy * gy).sqrt();
        }
    }
    plane_to_gray(&mag, src.width(), src.height())
}

/// Absolute 4-neighbor Laplacian response.
pub fn laplacian(src: &RasterBuffer) -> RasterBuffer {
    let plane = src.luminance_plane();
    let k = Kernel {
        data: LAPLACIAN.to_vec(),
        size: 3,
    };
    let resp = convolve_plane(&plane, src.width(), src.height(), &k);
    let mag: Vec<f32> = resp.iter().map(|v| v.abs()).collect();
    plane_to_gray(&mag, src.width(), src.height())
}

/// Absolute Laplacian-of-Gaussian response.
pub fn laplacian_of_gaussian(src: &RasterBuffer, kernel_size: u32, sigma: f32) -> RasterBuffer {
    let plane = src.luminance_plane();
    let resp = convolve_plane(
        &plane,
        src.width(),
        src.height(),
        &Kernel::laplacian_of_gaussian(kernel_size, sigma),
    );
    let mag: Vec<f32> = resp.iter().map(|v| v.abs()).collect();
    plane_to_gray(&mag, src.width(), src.height())
}

/// Absolute Gabor response: an oriented Gaussian-modulated sinusoid
/// convolved against luminance.
pub fn gabor(
    src: &RasterBuffer,
    kernel_size: u32,
    sigma: f32,
    theta: f32,
    lambda: f32,
    gamma: f32,
    psi: f32,
) -> RasterBuffer {
    let plane = src.luminance_plane();
    let resp = convolve_plane(
        &plane,
        src.width(),
        src.height(),
        &Kernel::gabor(kernel_size, sigma, theta, lambda, gamma, psi),
    );
    let mag: Vec<f32> = resp.iter().map(|v| v.abs()).collect();
    plane_to_gray(&mag, src.width(), src.height())
}

/// Difference of Gaussians: `|blur(sigma1) - blur(sigma2)|` on luminance.
pub fn difference_of_gaussians(
    src: &RasterBuffer,
    kernel_size: u32,
    sigma1: f32,
    sigma2: f32,
) -> RasterBuffer {
    let plane = src.luminance_plane();
    let a = convolve_plane(
        &plane,
        src.width(),
        src.height(),
        &Kernel::gaussian(kernel_size, sigma1),
    );
    let b = convolve_plane(
        &plane,
        src.width(),
        src.height(),
        &Kernel::gaussian(kernel_size, sigma2),
    );
    let diff: Vec<f32> = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).collect();
    plane_to_gray(&diff, src.width(), src.height())
}

/// Marr-Hildreth edges: LoG response, then 4-neighbor (left/right and
/// top/bottom) sign-change detection gated by a magnitude threshold.
pub fn marr_hildreth(
    src: &RasterBuffer,
    kernel_size: u32,
    sigma: f32,
    threshold: u8,
) -> RasterBuffer {
    let plane = src.luminance_plane();
    let resp = convolve_plane(
        &plane,
        src.width(),
        src.height(),
        &Kernel::laplacian_of_gaussian(kernel_size, sigma),
    );

    let w = src.width() as usize;
    let h = src.height() as usize;
    let thr = threshold as f32;

    let crossing = |a: f32, b: f32| -> bool { a * b < 0.0 && (a - b).abs() > thr };

    let mut edges = vec![0.0f32; resp.len()];
    for y in 0..h {
        for x in 0..w {
            let mut is_edge = false;
            if x > 0 && x + 1 < w {
                is_edge |= crossing(resp[y * w + x - 1], resp[y * w + x + 1]);
            }
            if y > 0 && y + 1 < h {
                is_edge |= crossing(resp[(y - 1) * w + x], resp[(y + 1) * w + x]);
            }
            if is_edge {
                edges[y * w + x] = 255.0;
            }
        }
    }
    plane_to_gray(&edges, src.width(), src.height())
}

/// Canny approximation: Sobel magnitude cut at two thresholds.
///
/// The magnitude is clamped to 255 so the 8-bit thresholds apply.
/// Magnitudes below `low` become 0, at or above `high` become 255, and
/// the band in between becomes 128 (weak edges, never promoted - there
/// is no hysteresis pass).
pub fn canny(src: &RasterBuffer, low: u8, high: u8) -> RasterBuffer {
    let plane = src.luminance_plane();
    let kx = Kernel {
        data: SOBEL.gx.to_vec(),
        size: 3,
    };
    let ky = Kernel {
        data: SOBEL.gy.to_vec(),
        size: 3,
    };
    let gx = convolve_plane(&plane, src.width(), src.height(), &kx);
    let gy = convolve_plane(&plane, src.width(), src.height(), &ky);

    let low = low as f32;
    let high = high as f32;
    let cut: Vec<f32> = gx
        .iter()
        .zip(gy.iter())
        .map(|(x, y)| {
            let mag = (x * x + y * y).sqrt().min(255.0);
            if mag >= high {
                255.0
            } else if mag >= low {
                128.0
            } else {
                0.0
            }
        })
        .collect();
    plane_to_gray(&cut, src.width(), src.height())
}
