//! Inputs for external cost estimation.
//!
//! The pipeline itself renders no estimate; it only exposes, per filter
//! step, the numbers an external performance display needs: the kind tag,
//! how many taps each pixel touches, how many full-image passes run, and
//! the broad class of per-pixel work. All of it is derived from the
//! normalized parameters, so the figures match what will actually execute.

use serde::Serialize;

use crate::step::{FilterKind, FilterParams};

/// Broad class of per-pixel work a filter performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkClass {
    /// Independent per-pixel remap (LUTs, channel arithmetic).
    Point,
    /// Kernel convolution, cost proportional to kernel area.
    Convolution,
    /// Windowed statistic with a sort or histogram per pixel.
    Windowed,
    /// Tiled histogram construction plus per-pixel blending.
    Tiled,
    /// Integral-image box means, O(1) per pixel per pass.
    Integral,
    /// Sequential distance propagation sweeps.
    Propagation,
}

/// Cost-estimation inputs for one filter application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostFactors {
    /// Which filter.
    pub kind: FilterKind,
    /// Taps read per pixel per pass (1 for point operations).
    pub kernel_area: u32,
    /// Number of full-image passes.
    pub passes: u32,
    /// Class of per-pixel work.
    pub work: WorkClass,
}

impl CostFactors {
    /// Derives the cost inputs from a parameter set.
    ///
    /// Parameters are normalized first, so the reported kernel areas are
    /// the clamped-and-odd sizes the filter will actually run with.
    pub fn for_params(params: &FilterParams) -> Self {
        use FilterParams as P;
        use WorkClass as W;

        let area = |k: u32| k * k;
        let (kernel_area, passes, work) = match params.normalized() {
            P::Grayscale | P::Invert | P::Gamma { .. } => (1, 1, W::Point),
            P::GaussianBlur { kernel_size, .. } | P::BoxBlur { kernel_size } => {
                (area(kernel_size), 1, W::Convolution)
            }
            P::Sharpen { .. } => (9, 1, W::Convolution),
            P::UnsharpMask { kernel_size, .. } => (area(kernel_size), 2, W::Convolution),
            P::Sobel | P::Prewitt | P::Scharr => (9, 2, W::Convolution),
            P::Roberts => (4, 2, W::Convolution),
            P::Laplacian => (9, 1, W::Convolution),
            P::LaplacianOfGaussian { kernel_size, .. } => (area(kernel_size), 1, W::Convolution),
            P::DifferenceOfGaussians { kernel_size, .. } => (area(kernel_size), 2, W::Convolution),
            P::MarrHildreth { kernel_size, .. } => (area(kernel_size), 2, W::Convolution),
            P::Canny { .. } => (9, 2, W::Convolution),
            P::Gabor { kernel_size, .. } => (area(kernel_size), 1, W::Convolution),
            P::HistogramEqualization => (1, 2, W::Point),
            P::LocalHistogramEqualization { kernel_size } => (area(kernel_size), 1, W::Windowed),
            P::AdaptiveHistogramEqualization { .. } | P::Clahe { .. } => (1, 2, W::Tiled),
            P::Median { kernel_size } | P::WeightedMedian { kernel_size } => {
                (area(kernel_size), 1, W::Windowed)
            }
            P::AlphaTrimmedMean { kernel_size, .. } => (area(kernel_size), 1, W::Windowed),
            P::GuidedFilter { .. } => (1, 8, W::Integral),
            P::Erode { kernel_size } | P::Dilate { kernel_size } => {
                (area(kernel_size), 1, W::Windowed)
            }
            P::Open { kernel_size } | P::Close { kernel_size } => {
                (area(kernel_size), 2, W::Windowed)
            }
            P::TopHat { kernel_size }
            | P::BlackHat { kernel_size }
            | P::MorphGradient { kernel_size } => (area(kernel_size), 2, W::Windowed),
            P::DistanceTransform { .. } => (2, 2, W::Propagation),
            P::LawsTextureEnergy { energy_window, .. } => {
                (25 + area(energy_window), 2, W::Convolution)
            }
            P::LocalBinaryPattern => (8, 1, W::Windowed),
            P::Dft => (area(9), 2, W::Convolution),
            P::Dct => (9, 1, W::Convolution),
            P::Wavelet => (9, 1, W::Convolution),
        };

        Self {
            kind: params.kind(),
            kernel_area,
            passes,
            work,
        }
    }

    /// Taps read per pixel across all passes.
    pub fn taps_per_pixel(&self) -> u64 {
        self.kernel_area as u64 * self.passes as u64
    }

    /// Rough operation count for a given image size.
    pub fn estimated_ops(&self, width: u32, height: u32) -> u64 {
        width as u64 * height as u64 * self.taps_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_op_is_cheap() {
        let f = CostFactors::for_params(&FilterParams::Invert);
        assert_eq!(f.kind, FilterKind::Invert);
        assert_eq!(f.taps_per_pixel(), 1);
        assert_eq!(f.work, WorkClass::Point);
    }

    #[test]
    fn test_kernel_area_reflects_normalized_size() {
        // kernel_size 6 normalizes to 7
        let f = CostFactors::for_params(&FilterParams::GaussianBlur {
            kernel_size: 6,
            sigma: 1.0,
        });
        assert_eq!(f.kernel_area, 49);
    }

    #[test]
    fn test_scaling_with_image_size() {
        let f = CostFactors::for_params(&FilterParams::Median { kernel_size: 5 });
        assert_eq!(f.estimated_ops(10, 10), 100 * 25);
        assert_eq!(f.estimated_ops(20, 10), 200 * 25);
    }

    #[test]
    fn test_guided_cost_independent_of_radius() {
        let small = CostFactors::for_params(&FilterParams::GuidedFilter {
            radius: 2,
            epsilon: 0.01,
        });
        let large = CostFactors::for_params(&FilterParams::GuidedFilter {
            radius: 16,
            epsilon: 0.01,
        });
        assert_eq!(small.taps_per_pixel(), large.taps_per_pixel());
        assert_eq!(small.work, WorkClass::Integral);
    }

    #[test]
    fn test_serializes_for_ui() {
        let f = CostFactors::for_params(&FilterParams::Clahe {
            tiles: 8,
            clip_limit: 2.0,
        });
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"tiled\""));
        assert!(json.contains("clahe"));
    }
}
