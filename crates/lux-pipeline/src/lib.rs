//! # lux-pipeline
//!
//! The filter chain executor for LUX: sequencing, result caching,
//! progress reporting, and the fail-soft guarantee.
//!
//! [`ChainExecutor::apply_chain`] takes a source buffer and a
//! [`FilterChain`](lux_filters::FilterChain), runs the enabled steps
//! strictly in order through a
//! [`FilterDispatcher`](lux_vision::FilterDispatcher), and returns the
//! final buffer. Results are cached under a `(content, chain)` signature
//! pair in a bounded FIFO store; any step failure aborts the rest of the
//! chain and hands back a fresh duplicate of the untouched source.
//!
//! ## Usage
//!
//! ```rust
//! use lux_core::RasterBuffer;
//! use lux_filters::{FilterChain, FilterParams, FilterStep};
//! use lux_pipeline::ChainExecutor;
//!
//! let mut executor = ChainExecutor::new();
//! let src = RasterBuffer::filled(32, 32, [180, 90, 30, 255]);
//! let chain = FilterChain::new()
//!     .with(FilterStep::new(1, FilterParams::Grayscale))
//!     .with(FilterStep::new(2, FilterParams::GaussianBlur {
//!         kernel_size: 5,
//!         sigma: 1.0,
//!     }));
//!
//! let out = executor.apply_chain(&src, &chain, None);
//! assert_eq!(out.width(), 32);
//! assert_eq!(executor.cache_len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod executor;
pub mod signature;

pub use cache::{CacheStats, DEFAULT_CACHE_CAPACITY, ResultCache};
pub use executor::{ChainExecutor, ExecutorBuilder, ExecutorConfig, ProgressFn};
pub use signature::{CacheKey, ChainSignature, ContentSignature, chain_signature};
