//! The chain executor: sequencing, caching, progress, fail-soft.
//!
//! # Configuration
//!
//! Use [`ExecutorBuilder`] for fine-grained control:
//!
//! ```rust
//! use lux_pipeline::ExecutorBuilder;
//!
//! let executor = ExecutorBuilder::new()
//!     .cache_capacity(8)
//!     .sample_stride(509)
//!     .build();
//! assert_eq!(executor.cache_capacity(), 8);
//! ```
//!
//! # Contract
//!
//! [`ChainExecutor::apply_chain`] is infallible at its boundary: whatever
//! happens inside — a filter rejecting its input, the accelerated backend
//! misbehaving, the result proving uncacheable — the caller receives a
//! valid buffer. The worst case is a fresh duplicate of the unmodified
//! source, never an error and never a corrupt image.

use lux_core::RasterBuffer;
use lux_filters::FilterChain;
use lux_vision::FilterDispatcher;
use tracing::{debug, warn};

use crate::cache::{CacheStats, DEFAULT_CACHE_CAPACITY, ResultCache};
use crate::signature::{CacheKey, ContentSignature, DEFAULT_SAMPLE_STRIDE, chain_signature};

/// Progress callback; receives the completed fraction in `[0.0, 1.0]`.
pub type ProgressFn<'a> = &'a mut dyn FnMut(f32);

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum cached chain results.
    pub cache_capacity: usize,
    /// Byte stride of the content-signature sample.
    pub sample_stride: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

/// Builder for [`ChainExecutor`].
#[derive(Default)]
pub struct ExecutorBuilder {
    config: ExecutorConfig,
    dispatcher: Option<FilterDispatcher>,
}

impl ExecutorBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the result-cache capacity (minimum 1).
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity.max(1);
        self
    }

    /// Sets the content-signature sampling stride (minimum 1).
    pub fn sample_stride(mut self, stride: usize) -> Self {
        self.config.sample_stride = stride.max(1);
        self
    }

    /// Installs a dispatcher (default: software only).
    pub fn dispatcher(mut self, dispatcher: FilterDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Builds the executor.
    pub fn build(self) -> ChainExecutor {
        ChainExecutor {
            dispatcher: self.dispatcher.unwrap_or_default(),
            cache: ResultCache::with_capacity(self.config.cache_capacity),
            sample_stride: self.config.sample_stride,
        }
    }
}

/// Applies filter chains to pixel buffers.
///
/// Owns the result cache; dropping the executor releases every cached
/// buffer. One executor serves one consumer — chains run strictly
/// sequentially on the calling thread, and a superseded request is simply
/// finished and overwritten by the caller's next one.
pub struct ChainExecutor {
    dispatcher: FilterDispatcher,
    cache: ResultCache,
    sample_stride: usize,
}

impl Default for ChainExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainExecutor {
    /// A software-only executor with default configuration.
    pub fn new() -> Self {
        ExecutorBuilder::new().build()
    }

    /// An executor with default configuration and the given dispatcher.
    pub fn with_dispatcher(dispatcher: FilterDispatcher) -> Self {
        ExecutorBuilder::new().dispatcher(dispatcher).build()
    }

    /// Applies the enabled steps of `chain` to `source`.
    ///
    /// Always returns a buffer independent of `source` (and of the cache),
    /// even for the identity chain. Progress is reported as `i / n` before
    /// step `i`, and `1.0` once a result is settled — including the
    /// identity, cache-hit, and fail-soft exits, so a consumer never
    /// observes an unfinished chain.
    pub fn apply_chain(
        &mut self,
        source: &RasterBuffer,
        chain: &FilterChain,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> RasterBuffer {
        let mut report = |fraction: f32| {
            if let Some(callback) = on_progress.as_mut() {
                callback(fraction);
            }
        };

        let steps = chain.enabled_steps();
        if steps.is_empty() {
            report(1.0);
            return source.duplicate();
        }

        let key = self.cache_key(source, chain);
        if let Some(key) = &key {
            if let Some(cached) = self.cache.get(key) {
                debug!(steps = steps.len(), "chain cache hit");
                let out = cached.duplicate();
                report(1.0);
                return out;
            }
        }

        let total = steps.len();
        let mut intermediate: Option<RasterBuffer> = None;
        for (index, step) in steps.iter().enumerate() {
            report(index as f32 / total as f32);
            let input = intermediate.as_ref().unwrap_or(source);
            match self.dispatcher.dispatch(input, &step.params) {
                // Assignment drops the previous intermediate; `source`
                // itself is never consumed
                Ok(output) => intermediate = Some(output),
                Err(err) => {
                    warn!(
                        step = index,
                        filter = step.params.kind().name(),
                        error = %err,
                        "chain step failed, returning unmodified source"
                    );
                    report(1.0);
                    return source.duplicate();
                }
            }
        }
        report(1.0);

        let result = intermediate.unwrap_or_else(|| source.duplicate());
        match key {
            Some(key) => self.cache.insert(key, result.duplicate()),
            None => debug!("result not cacheable, skipping cache write"),
        }
        result
    }

    /// Number of cached results.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Result-cache capacity.
    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Cache hit/miss counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The dispatcher this executor routes steps through.
    pub fn dispatcher(&self) -> &FilterDispatcher {
        &self.dispatcher
    }

    fn cache_key(&self, source: &RasterBuffer, chain: &FilterChain) -> Option<CacheKey> {
        let content = ContentSignature::sample(source, self.sample_stride)?;
        let chain = chain_signature(chain)?;
        Some(CacheKey { content, chain })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_filters::{FilterParams, FilterStep};

    fn gradient_image() -> RasterBuffer {
        let mut img = RasterBuffer::new(12, 12);
        for y in 0..12 {
            for x in 0..12 {
                let v = (x * 20 + y * 3) as u8;
                img.set_pixel(x, y, [v, v / 2, 255 - v, 255]).unwrap();
            }
        }
        img
    }

    fn invert_chain() -> FilterChain {
        FilterChain::new().with(FilterStep::new(1, FilterParams::Invert))
    }

    #[test]
    fn test_identity_chain_returns_fresh_equal_copy() {
        let mut executor = ChainExecutor::new();
        let src = gradient_image();

        let out = executor.apply_chain(&src, &FilterChain::new(), None);
        assert_eq!(out, src);

        // All-disabled chain is also the identity
        let disabled =
            FilterChain::new().with(FilterStep::disabled(1, FilterParams::Invert));
        let out = executor.apply_chain(&src, &disabled, None);
        assert_eq!(out, src);
        // Identity results are not cached; there is nothing to recompute
        assert_eq!(executor.cache_len(), 0);
    }

    #[test]
    fn test_disabled_steps_are_skipped() {
        let mut executor = ChainExecutor::new();
        let src = gradient_image();
        let chain = FilterChain::new()
            .with(FilterStep::disabled(1, FilterParams::Grayscale))
            .with(FilterStep::new(2, FilterParams::Invert));
        let out = executor.apply_chain(&src, &chain, None);
        assert_eq!(out, executor.apply_chain(&src, &invert_chain(), None));
    }

    #[test]
    fn test_progress_sequence() {
        let mut executor = ChainExecutor::new();
        let src = gradient_image();
        let chain = FilterChain::new()
            .with(FilterStep::new(1, FilterParams::Invert))
            .with(FilterStep::new(2, FilterParams::Grayscale));

        let mut reported = Vec::new();
        let mut on_progress = |fraction: f32| reported.push(fraction);
        executor.apply_chain(&src, &chain, Some(&mut on_progress));
        assert_eq!(reported, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_progress_completes_on_identity_and_cache_hit() {
        let mut executor = ChainExecutor::new();
        let src = gradient_image();

        let mut reported = Vec::new();
        let mut on_progress = |fraction: f32| reported.push(fraction);
        executor.apply_chain(&src, &FilterChain::new(), Some(&mut on_progress));
        assert_eq!(reported, vec![1.0]);

        executor.apply_chain(&src, &invert_chain(), None);
        let mut reported = Vec::new();
        let mut on_progress = |fraction: f32| reported.push(fraction);
        executor.apply_chain(&src, &invert_chain(), Some(&mut on_progress));
        assert_eq!(reported, vec![1.0]);
        assert_eq!(executor.cache_stats().hits, 1);
    }

    #[test]
    fn test_cache_hit_returns_equal_buffer() {
        let mut executor = ChainExecutor::new();
        let src = gradient_image();

        let first = executor.apply_chain(&src, &invert_chain(), None);
        let second = executor.apply_chain(&src, &invert_chain(), None);
        assert_eq!(first, second);
        assert_eq!(executor.cache_len(), 1);
        assert_eq!(executor.cache_stats().hits, 1);
        assert_eq!(executor.cache_stats().misses, 1);
    }

    #[test]
    fn test_fail_soft_returns_source_duplicate() {
        // Every filter refuses an empty buffer, so any enabled step fails
        let mut executor = ChainExecutor::new();
        let src = RasterBuffer::new(0, 0);

        let mut reported = Vec::new();
        let mut on_progress = |fraction: f32| reported.push(fraction);
        let out = executor.apply_chain(&src, &invert_chain(), Some(&mut on_progress));
        assert_eq!(out, src);
        assert_eq!(*reported.last().unwrap(), 1.0);
        assert_eq!(executor.cache_len(), 0);
    }

    #[test]
    fn test_chain_order_matters() {
        let mut executor = ChainExecutor::new();
        let src = gradient_image();
        let sharpen_then_blur = FilterChain::new()
            .with(FilterStep::new(1, FilterParams::Sharpen { amount: 2.0 }))
            .with(FilterStep::new(
                2,
                FilterParams::GaussianBlur {
                    kernel_size: 5,
                    sigma: 1.0,
                },
            ));
        let blur_then_sharpen = FilterChain::new()
            .with(FilterStep::new(
                1,
                FilterParams::GaussianBlur {
                    kernel_size: 5,
                    sigma: 1.0,
                },
            ))
            .with(FilterStep::new(2, FilterParams::Sharpen { amount: 2.0 }));

        let a = executor.apply_chain(&src, &sharpen_then_blur, None);
        let b = executor.apply_chain(&src, &blur_then_sharpen, None);
        assert_ne!(a, b);
        assert_eq!(executor.cache_len(), 2);
    }

    #[test]
    fn test_clear_cache() {
        let mut executor = ExecutorBuilder::new().cache_capacity(5).build();
        let src = gradient_image();
        executor.apply_chain(&src, &invert_chain(), None);
        assert_eq!(executor.cache_len(), 1);
        executor.clear_cache();
        assert_eq!(executor.cache_len(), 0);
        assert_eq!(executor.cache_capacity(), 5);
    }

    #[test]
    fn test_source_never_mutated() {
        let mut executor = ChainExecutor::new();
        let src = gradient_image();
        let snapshot = src.duplicate();
        let chain = FilterChain::new()
            .with(FilterStep::new(1, FilterParams::Sobel))
            .with(FilterStep::new(2, FilterParams::Median { kernel_size: 3 }));
        let _ = executor.apply_chain(&src, &chain, None);
        assert_eq!(src, snapshot);
    }
}
