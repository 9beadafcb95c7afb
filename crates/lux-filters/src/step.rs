//! Filter parameter model: kinds, per-kind parameters, steps, and chains.
//!
//! [`FilterParams`] is a tagged union with one variant per filter kind,
//! each carrying only the fields that kind actually uses. All numeric
//! fields have a valid domain; [`FilterParams::normalized`] clamps every
//! field into it. Out-of-domain values are always repaired, never
//! rejected - a chain built from arbitrary UI input must still run.
//!
//! A [`FilterChain`] is an ordered sequence of [`FilterStep`]s. Order is
//! significant (filter composition does not commute), and individual
//! steps can be disabled without being removed. A chain with no enabled
//! steps is the identity transform.
//!
//! All types serialize with serde; the executor's chain signature is the
//! JSON form of the enabled, normalized steps.

use serde::{Deserialize, Serialize};

/// Fieldless tag identifying a filter kind.
///
/// This is the "filter type" half of the cost-estimation input contract
/// and the key the dispatcher uses to ask a backend whether it covers a
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum FilterKind {
    Grayscale,
    Invert,
    Gamma,
    GaussianBlur,
    BoxBlur,
    Sharpen,
    UnsharpMask,
    Sobel,
    Prewitt,
    Scharr,
    Roberts,
    Laplacian,
    LaplacianOfGaussian,
    DifferenceOfGaussians,
    MarrHildreth,
    Canny,
    Gabor,
    HistogramEqualization,
    LocalHistogramEqualization,
    AdaptiveHistogramEqualization,
    Clahe,
    Median,
    WeightedMedian,
    AlphaTrimmedMean,
    GuidedFilter,
    Erode,
    Dilate,
    Open,
    Close,
    TopHat,
    BlackHat,
    MorphGradient,
    DistanceTransform,
    LawsTextureEnergy,
    LocalBinaryPattern,
    Dft,
    Dct,
    Wavelet,
}

impl FilterKind {
    /// Human-readable name (matches the serde snake_case form).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Invert => "invert",
            Self::Gamma => "gamma",
            Self::GaussianBlur => "gaussian_blur",
            Self::BoxBlur => "box_blur",
            Self::Sharpen => "sharpen",
            Self::UnsharpMask => "unsharp_mask",
            Self::Sobel => "sobel",
            Self::Prewitt => "prewitt",
            Self::Scharr => "scharr",
            Self::Roberts => "roberts",
            Self::Laplacian => "laplacian",
            Self::LaplacianOfGaussian => "laplacian_of_gaussian",
            Self::DifferenceOfGaussians => "difference_of_gaussians",
            Self::MarrHildreth => "marr_hildreth",
            Self::Canny => "canny",
            Self::Gabor => "gabor",
            Self::HistogramEqualization => "histogram_equalization",
            Self::LocalHistogramEqualization => "local_histogram_equalization",
            Self::AdaptiveHistogramEqualization => "adaptive_histogram_equalization",
            Self::Clahe => "clahe",
            Self::Median => "median",
            Self::WeightedMedian => "weighted_median",
            Self::AlphaTrimmedMean => "alpha_trimmed_mean",
            Self::GuidedFilter => "guided_filter",
            Self::Erode => "erode",
            Self::Dilate => "dilate",
            Self::Open => "open",
            Self::Close => "close",
            Self::TopHat => "top_hat",
            Self::BlackHat => "black_hat",
            Self::MorphGradient => "morph_gradient",
            Self::DistanceTransform => "distance_transform",
            Self::LawsTextureEnergy => "laws_texture_energy",
            Self::LocalBinaryPattern => "local_binary_pattern",
            Self::Dft => "dft",
            Self::Dct => "dct",
            Self::Wavelet => "wavelet",
        }
    }
}

/// One of the five 1-D vectors Laws' texture energy kernels are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawsVector {
    /// Level (local average).
    L5,
    /// Edge.
    E5,
    /// Spot.
    S5,
    /// Wave.
    W5,
    /// Ripple.
    R5,
}

impl LawsVector {
    /// The 1-D filter taps for this vector.
    pub fn taps(&self) -> [f32; 5] {
        match self {
            Self::L5 => [1.0, 4.0, 6.0, 4.0, 1.0],
            Self::E5 => [-1.0, -2.0, 0.0, 2.0, 1.0],
            Self::S5 => [-1.0, 0.0, 2.0, 0.0, -1.0],
            Self::W5 => [-1.0, 2.0, 0.0, -2.0, 1.0],
            Self::R5 => [1.0, -4.0, 6.0, -4.0, 1.0],
        }
    }
}

/// Per-kind filter parameters.
///
/// One variant per filter kind; dispatch is an exhaustive match, so
/// adding a kind without wiring it up everywhere is a compile error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum FilterParams {
    Grayscale,
    Invert,
    Gamma { gamma: f32 },
    GaussianBlur { kernel_size: u32, sigma: f32 },
    BoxBlur { kernel_size: u32 },
    Sharpen { amount: f32 },
    UnsharpMask { kernel_size: u32, sigma: f32, amount: f32 },
    Sobel,
    Prewitt,
    Scharr,
    Roberts,
    Laplacian,
    LaplacianOfGaussian { kernel_size: u32, sigma: f32 },
    DifferenceOfGaussians { kernel_size: u32, sigma1: f32, sigma2: f32 },
    MarrHildreth { kernel_size: u32, sigma: f32, threshold: u8 },
    Canny { low_threshold: u8, high_threshold: u8 },
    Gabor { kernel_size: u32, sigma: f32, theta: f32, lambda: f32, gamma: f32, psi: f32 },
    HistogramEqualization,
    LocalHistogramEqualization { kernel_size: u32 },
    AdaptiveHistogramEqualization { tiles: u32 },
    Clahe { tiles: u32, clip_limit: f32 },
    Median { kernel_size: u32 },
    WeightedMedian { kernel_size: u32 },
    AlphaTrimmedMean { kernel_size: u32, alpha: f32 },
    GuidedFilter { radius: u32, epsilon: f32 },
    Erode { kernel_size: u32 },
    Dilate { kernel_size: u32 },
    Open { kernel_size: u32 },
    Close { kernel_size: u32 },
    TopHat { kernel_size: u32 },
    BlackHat { kernel_size: u32 },
    MorphGradient { kernel_size: u32 },
    DistanceTransform { low_threshold: u8 },
    LawsTextureEnergy { vector1: LawsVector, vector2: LawsVector, energy_window: u32 },
    LocalBinaryPattern,
    Dft,
    Dct,
    Wavelet,
}

/// Kernel-size bounds for convolution-style filters.
const CONV_KERNEL_RANGE: (u32, u32) = (3, 31);
/// Kernel-size bounds for windowed (per-pixel O(k²)) filters.
const WINDOW_KERNEL_RANGE: (u32, u32) = (3, 15);
/// Sigma bounds for Gaussian-derived kernels.
const SIGMA_RANGE: (f32, f32) = (0.1, 10.0);

/// Clamps `v` into `[lo, hi]` and forces it odd.
///
/// Even values round up, except at the top of the range where they round
/// down; `lo` and `hi` are both expected to be odd.
fn odd_clamp(v: u32, (lo, hi): (u32, u32)) -> u32 {
    let v = v.clamp(lo, hi);
    if v % 2 == 1 {
        v
    } else if v + 1 <= hi {
        v + 1
    } else {
        v - 1
    }
}

fn clamp_f32(v: f32, (lo, hi): (f32, f32)) -> f32 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

impl FilterParams {
    /// The fieldless kind tag for this parameter set.
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Grayscale => FilterKind::Grayscale,
            Self::Invert => FilterKind::Invert,
            Self::Gamma { .. } => FilterKind::Gamma,
            Self::GaussianBlur { .. } => FilterKind::GaussianBlur,
            Self::BoxBlur { .. } => FilterKind::BoxBlur,
            Self::Sharpen { .. } => FilterKind::Sharpen,
            Self::UnsharpMask { .. } => FilterKind::UnsharpMask,
            Self::Sobel => FilterKind::Sobel,
            Self::Prewitt => FilterKind::Prewitt,
            Self::Scharr => FilterKind::Scharr,
            Self::Roberts => FilterKind::Roberts,
            Self::Laplacian => FilterKind::Laplacian,
            Self::LaplacianOfGaussian { .. } => FilterKind::LaplacianOfGaussian,
            Self::DifferenceOfGaussians { .. } => FilterKind::DifferenceOfGaussians,
            Self::MarrHildreth { .. } => FilterKind::MarrHildreth,
            Self::Canny { .. } => FilterKind::Canny,
            Self::Gabor { .. } => FilterKind::Gabor,
            Self::HistogramEqualization => FilterKind::HistogramEqualization,
            Self::LocalHistogramEqualization { .. } => FilterKind::LocalHistogramEqualization,
            Self::AdaptiveHistogramEqualization { .. } => {
                FilterKind::AdaptiveHistogramEqualization
            }
            Self::Clahe { .. } => FilterKind::Clahe,
            Self::Median { .. } => FilterKind::Median,
            Self::WeightedMedian { .. } => FilterKind::WeightedMedian,
            Self::AlphaTrimmedMean { .. } => FilterKind::AlphaTrimmedMean,
            Self::GuidedFilter { .. } => FilterKind::GuidedFilter,
            Self::Erode { .. } => FilterKind::Erode,
            Self::Dilate { .. } => FilterKind::Dilate,
            Self::Open { .. } => FilterKind::Open,
            Self::Close { .. } => FilterKind::Close,
            Self::TopHat { .. } => FilterKind::TopHat,
            Self::BlackHat { .. } => FilterKind::BlackHat,
            Self::MorphGradient { .. } => FilterKind::MorphGradient,
            Self::DistanceTransform { .. } => FilterKind::DistanceTransform,
            Self::LawsTextureEnergy { .. } => FilterKind::LawsTextureEnergy,
            Self::LocalBinaryPattern => FilterKind::LocalBinaryPattern,
            Self::Dft => FilterKind::Dft,
            Self::Dct => FilterKind::Dct,
            Self::Wavelet => FilterKind::Wavelet,
        }
    }

    /// Returns a copy with every field clamped into its valid domain.
    ///
    /// Kernel sizes become odd values within the per-filter range, sigmas
    /// become positive, fractions land in their closed intervals, and the
    /// Canny thresholds are reordered so low ≤ high. Normalization is
    /// idempotent.
    pub fn normalized(&self) -> Self {
        match *self {
            Self::Grayscale => Self::Grayscale,
            Self::Invert => Self::Invert,
            Self::Gamma { gamma } => Self::Gamma {
                gamma: clamp_f32(gamma, (0.1, 10.0)),
            },
            Self::GaussianBlur { kernel_size, sigma } => Self::GaussianBlur {
                kernel_size: odd_clamp(kernel_size, CONV_KERNEL_RANGE),
                sigma: clamp_f32(sigma, SIGMA_RANGE),
            },
            Self::BoxBlur { kernel_size } => Self::BoxBlur {
                kernel_size: odd_clamp(kernel_size, CONV_KERNEL_RANGE),
            },
            Self::Sharpen { amount } => Self::Sharpen {
                amount: clamp_f32(amount, (0.0, 10.0)),
            },
            Self::UnsharpMask {
                kernel_size,
                sigma,
                amount,
            } => Self::UnsharpMask {
                kernel_size: odd_clamp(kernel_size, CONV_KERNEL_RANGE),
                sigma: clamp_f32(sigma, SIGMA_RANGE),
                amount: clamp_f32(amount, (0.0, 10.0)),
            },
            Self::Sobel => Self::Sobel,
            Self::Prewitt => Self::Prewitt,
            Self::Scharr => Self::Scharr,
            Self::Roberts => Self::Roberts,
            Self::Laplacian => Self::Laplacian,
            Self::LaplacianOfGaussian { kernel_size, sigma } => Self::LaplacianOfGaussian {
                kernel_size: odd_clamp(kernel_size, CONV_KERNEL_RANGE),
                sigma: clamp_f32(sigma, SIGMA_RANGE),
            },
            Self::DifferenceOfGaussians {
                kernel_size,
                sigma1,
                sigma2,
            } => Self::DifferenceOfGaussians {
                kernel_size: odd_clamp(kernel_size, CONV_KERNEL_RANGE),
                sigma1: clamp_f32(sigma1, SIGMA_RANGE),
                sigma2: clamp_f32(sigma2, SIGMA_RANGE),
            },
            Self::MarrHildreth {
                kernel_size,
                sigma,
                threshold,
            } => Self::MarrHildreth {
                kernel_size: odd_clamp(kernel_size, CONV_KERNEL_RANGE),
                sigma: clamp_f32(sigma, SIGMA_RANGE),
                threshold,
            },
            Self::Canny {
                low_threshold,
                high_threshold,
            } => Self::Canny {
                low_threshold: low_threshold.min(high_threshold),
                high_threshold: low_threshold.max(high_threshold),
            },
            Self::Gabor {
                kernel_size,
                sigma,
                theta,
                lambda,
                gamma,
                psi,
            } => Self::Gabor {
                kernel_size: odd_clamp(kernel_size, CONV_KERNEL_RANGE),
                sigma: clamp_f32(sigma, SIGMA_RANGE),
                theta: if theta.is_nan() { 0.0 } else { theta },
                lambda: clamp_f32(lambda, (1.0, 64.0)),
                gamma: clamp_f32(gamma, (0.1, 2.0)),
                psi: if psi.is_nan() { 0.0 } else { psi },
            },
            Self::HistogramEqualization => Self::HistogramEqualization,
            Self::LocalHistogramEqualization { kernel_size } => Self::LocalHistogramEqualization {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::AdaptiveHistogramEqualization { tiles } => Self::AdaptiveHistogramEqualization {
                tiles: tiles.clamp(2, 16),
            },
            Self::Clahe { tiles, clip_limit } => Self::Clahe {
                tiles: tiles.clamp(2, 16),
                clip_limit: clamp_f32(clip_limit, (1.0, 10.0)),
            },
            Self::Median { kernel_size } => Self::Median {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::WeightedMedian { kernel_size } => Self::WeightedMedian {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::AlphaTrimmedMean { kernel_size, alpha } => Self::AlphaTrimmedMean {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
                alpha: clamp_f32(alpha, (0.0, 0.5)),
            },
            Self::GuidedFilter { radius, epsilon } => Self::GuidedFilter {
                radius: radius.clamp(1, 20),
                epsilon: clamp_f32(epsilon, (1e-6, 1.0)),
            },
            Self::Erode { kernel_size } => Self::Erode {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::Dilate { kernel_size } => Self::Dilate {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::Open { kernel_size } => Self::Open {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::Close { kernel_size } => Self::Close {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::TopHat { kernel_size } => Self::TopHat {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::BlackHat { kernel_size } => Self::BlackHat {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::MorphGradient { kernel_size } => Self::MorphGradient {
                kernel_size: odd_clamp(kernel_size, WINDOW_KERNEL_RANGE),
            },
            Self::DistanceTransform { low_threshold } => {
                Self::DistanceTransform { low_threshold }
            }
            Self::LawsTextureEnergy {
                vector1,
                vector2,
                energy_window,
            } => Self::LawsTextureEnergy {
                vector1,
                vector2,
                energy_window: odd_clamp(energy_window, WINDOW_KERNEL_RANGE),
            },
            Self::LocalBinaryPattern => Self::LocalBinaryPattern,
            Self::Dft => Self::Dft,
            Self::Dct => Self::Dct,
            Self::Wavelet => Self::Wavelet,
        }
    }
}

/// A single entry in a filter chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStep {
    /// Caller-assigned identifier (stable across reorders in the UI).
    pub id: u64,
    /// The filter to apply.
    pub params: FilterParams,
    /// Disabled steps are skipped without being removed.
    pub enabled: bool,
}

impl FilterStep {
    /// Creates an enabled step.
    pub fn new(id: u64, params: FilterParams) -> Self {
        Self {
            id,
            params,
            enabled: true,
        }
    }

    /// Creates a disabled step.
    pub fn disabled(id: u64, params: FilterParams) -> Self {
        Self {
            id,
            params,
            enabled: false,
        }
    }
}

/// An ordered, individually enable/disable-able sequence of filter steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterChain {
    /// The steps, in application order.
    pub steps: Vec<FilterStep>,
}

impl FilterChain {
    /// Creates an empty chain (the identity transform).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain from steps.
    pub fn from_steps(steps: Vec<FilterStep>) -> Self {
        Self { steps }
    }

    /// Appends a step, builder-style.
    pub fn with(mut self, step: FilterStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Total number of steps, enabled or not.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps at all.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The enabled steps, in order.
    pub fn enabled_steps(&self) -> Vec<&FilterStep> {
        self.steps.iter().filter(|s| s.enabled).collect()
    }

    /// Whether applying this chain is a no-op (no enabled steps).
    pub fn is_identity(&self) -> bool {
        self.steps.iter().all(|s| !s.enabled)
    }
}
