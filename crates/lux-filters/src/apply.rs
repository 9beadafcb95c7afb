//! Software dispatch: one entry point over every filter kind.
//!
//! [`apply`] normalizes the parameters, then routes to the implementing
//! module with an exhaustive match — adding a [`FilterParams`] variant
//! without wiring it here is a compile error.

use lux_core::RasterBuffer;
use tracing::debug;

use crate::error::{FilterError, FilterResult};
use crate::step::FilterParams;
use crate::{blur, color, distance, edge, guided, histogram, morphology, rank, spectral, texture};

/// Applies one filter in software, producing a new buffer of the same
/// dimensions.
///
/// Parameters are clamped into their valid domain before use; the only
/// error an otherwise-valid call can produce is an empty input buffer.
pub fn apply(src: &RasterBuffer, params: &FilterParams) -> FilterResult<RasterBuffer> {
    if src.is_empty() {
        return Err(FilterError::EmptyInput {
            width: src.width(),
            height: src.height(),
        });
    }

    let params = params.normalized();
    debug!(filter = params.kind().name(), "apply");

    let out = match params {
        FilterParams::Grayscale => color::grayscale(src),
        FilterParams::Invert => color::invert(src),
        FilterParams::Gamma { gamma } => color::gamma(src, gamma),
        FilterParams::GaussianBlur { kernel_size, sigma } => {
            blur::gaussian_blur(src, kernel_size, sigma)
        }
        FilterParams::BoxBlur { kernel_size } => blur::box_blur(src, kernel_size),
        FilterParams::Sharpen { amount } => blur::sharpen(src, amount),
        FilterParams::UnsharpMask {
            kernel_size,
            sigma,
            amount,
        } => blur::unsharp_mask(src, kernel_size, sigma, amount),
        FilterParams::Sobel => edge::sobel(src),
        FilterParams::Prewitt => edge::prewitt(src),
        FilterParams::Scharr => edge::scharr(src),
        FilterParams::Roberts => edge::roberts(src),
        FilterParams::Laplacian => edge::laplacian(src),
        FilterParams::LaplacianOfGaussian { kernel_size, sigma } => {
            edge::laplacian_of_gaussian(src, kernel_size, sigma)
        }
        FilterParams::DifferenceOfGaussians {
            kernel_size,
            sigma1,
            sigma2,
        } => edge::difference_of_gaussians(src, kernel_size, sigma1, sigma2),
        FilterParams::MarrHildreth {
            kernel_size,
            sigma,
            threshold,
        } => edge::marr_hildreth(src, kernel_size, sigma, threshold),
        FilterParams::Canny {
            low_threshold,
            high_threshold,
        } => edge::canny(src, low_threshold, high_threshold),
        FilterParams::Gabor {
            kernel_size,
            sigma,
            theta,
            lambda,
            gamma,
            psi,
        } => edge::gabor(src, kernel_size, sigma, theta, lambda, gamma, psi),
        FilterParams::HistogramEqualization => histogram::equalize_global(src),
        FilterParams::LocalHistogramEqualization { kernel_size } => {
            histogram::equalize_local(src, kernel_size)
        }
        FilterParams::AdaptiveHistogramEqualization { tiles } => {
            histogram::equalize_adaptive(src, tiles)
        }
        FilterParams::Clahe { tiles, clip_limit } => histogram::clahe(src, tiles, clip_limit),
        FilterParams::Median { kernel_size } => rank::median(src, kernel_size),
        FilterParams::WeightedMedian { kernel_size } => rank::weighted_median(src, kernel_size),
        FilterParams::AlphaTrimmedMean { kernel_size, alpha } => {
            rank::alpha_trimmed_mean(src, kernel_size, alpha)
        }
        FilterParams::GuidedFilter { radius, epsilon } => guided::guided_filter(src, radius, epsilon),
        FilterParams::Erode { kernel_size } => morphology::erode(src, kernel_size),
        FilterParams::Dilate { kernel_size } => morphology::dilate(src, kernel_size),
        FilterParams::Open { kernel_size } => morphology::open(src, kernel_size),
        FilterParams::Close { kernel_size } => morphology::close(src, kernel_size),
        FilterParams::TopHat { kernel_size } => morphology::top_hat(src, kernel_size),
        FilterParams::BlackHat { kernel_size } => morphology::black_hat(src, kernel_size),
        FilterParams::MorphGradient { kernel_size } => morphology::morph_gradient(src, kernel_size),
        FilterParams::DistanceTransform { low_threshold } => {
            distance::distance_transform(src, low_threshold)
        }
        FilterParams::LawsTextureEnergy {
            vector1,
            vector2,
            energy_window,
        } => texture::laws_texture_energy(src, vector1, vector2, energy_window),
        FilterParams::LocalBinaryPattern => texture::local_binary_pattern(src),
        FilterParams::Dft => spectral::dft(src),
        FilterParams::Dct => spectral::dct(src),
        FilterParams::Wavelet => spectral::wavelet(src),
    };
    Ok(out)
}
