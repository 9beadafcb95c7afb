//! # lux-filters
//!
//! Filter parameter model and software filter library for the LUX
//! pipeline.
//!
//! Every filter the pipeline knows is implemented here in pure software;
//! the accelerated backend in `lux-vision` covers a subset of the same
//! kinds with identical signatures. A filter consumes a
//! [`RasterBuffer`](lux_core::RasterBuffer) and produces a new one of the
//! same dimensions — inputs are never mutated.
//!
//! ## Modules
//!
//! - [`step`] - [`FilterKind`]/[`FilterParams`] tagged union, steps, chains
//! - [`kernel`] - convolution kernels and the convolution engine
//! - [`color`], [`blur`], [`edge`], [`histogram`], [`rank`], [`guided`],
//!   [`morphology`], [`distance`], [`texture`], [`spectral`] - the filter
//!   implementations, grouped by family
//! - [`apply`](mod@apply) - exhaustive-match dispatch over every kind
//! - [`cost`] - cost-estimation inputs for an external estimate display
//!
//! ## Usage
//!
//! ```rust
//! use lux_core::RasterBuffer;
//! use lux_filters::{FilterParams, apply};
//!
//! let src = RasterBuffer::filled(16, 16, [128, 128, 128, 255]);
//! let out = apply(
//!     &src,
//!     &FilterParams::GaussianBlur { kernel_size: 5, sigma: 1.0 },
//! )
//! .unwrap();
//! assert_eq!(out.width(), 16);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod apply;
pub mod blur;
pub mod color;
pub mod cost;
pub mod distance;
pub mod edge;
pub mod error;
pub mod guided;
pub mod histogram;
pub mod kernel;
pub mod morphology;
pub mod rank;
pub mod spectral;
pub mod step;
pub mod texture;

pub use apply::apply;
pub use cost::{CostFactors, WorkClass};
pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;
pub use step::{FilterChain, FilterKind, FilterParams, FilterStep, LawsVector};
