//! Integration tests for the LUX crates.
//!
//! This crate contains end-to-end tests that verify the interaction
//! between the filter library, the dispatcher, and the chain executor:
//! the pipeline-wide properties (identity, determinism, cache bound,
//! fail-soft) that no single crate can assert on its own.

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha256};

    use lux_core::RasterBuffer;
    use lux_filters::{FilterChain, FilterKind, FilterParams, FilterStep};
    use lux_pipeline::{ChainExecutor, ExecutorBuilder};
    use lux_vision::{AcceleratedBackend, BackendGate, FilterDispatcher, VisionError, VisionResult};

    /// Content digest for byte-identity assertions.
    fn digest(buffer: &RasterBuffer) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(buffer.width().to_le_bytes());
        hasher.update(buffer.height().to_le_bytes());
        hasher.update(buffer.data());
        hasher.finalize().into()
    }

    /// Deterministic non-uniform test image.
    fn test_image(width: u32, height: u32) -> RasterBuffer {
        let mut img = RasterBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 7 + y * 13) % 256) as u8;
                img.set_pixel(x, y, [v, v.wrapping_mul(3), 255 - v, 255])
                    .unwrap();
            }
        }
        img
    }

    fn step(id: u64, params: FilterParams) -> FilterStep {
        FilterStep::new(id, params)
    }

    /// A representative mixed chain touching several filter families.
    fn mixed_chain() -> FilterChain {
        FilterChain::new()
            .with(step(
                1,
                FilterParams::GaussianBlur {
                    kernel_size: 5,
                    sigma: 1.0,
                },
            ))
            .with(step(
                2,
                FilterParams::Clahe {
                    tiles: 2,
                    clip_limit: 2.0,
                },
            ))
            .with(step(3, FilterParams::Sobel))
    }

    #[test]
    fn test_identity_chain_is_pixel_identical_fresh_copy() {
        let mut executor = ChainExecutor::new();
        let src = test_image(24, 16);
        let out = executor.apply_chain(&src, &FilterChain::new(), None);
        assert_eq!(digest(&out), digest(&src));
    }

    #[test]
    fn test_apply_chain_is_deterministic() {
        let mut executor = ChainExecutor::new();
        let src = test_image(32, 24);
        let first = executor.apply_chain(&src, &mixed_chain(), None);

        // Bypass the cache with a fresh executor: same inputs, same bytes
        let mut fresh = ChainExecutor::new();
        let second = fresh.apply_chain(&src, &mixed_chain(), None);
        assert_eq!(digest(&first), digest(&second));
    }

    #[test]
    fn test_grayscale_idempotent_invert_involutive() {
        let mut executor = ChainExecutor::new();
        let src = test_image(16, 16);

        let gray_once = FilterChain::new().with(step(1, FilterParams::Grayscale));
        let gray_twice = FilterChain::new()
            .with(step(1, FilterParams::Grayscale))
            .with(step(2, FilterParams::Grayscale));
        assert_eq!(
            digest(&executor.apply_chain(&src, &gray_once, None)),
            digest(&executor.apply_chain(&src, &gray_twice, None)),
        );

        let invert_twice = FilterChain::new()
            .with(step(1, FilterParams::Invert))
            .with(step(2, FilterParams::Invert));
        assert_eq!(
            digest(&executor.apply_chain(&src, &invert_twice, None)),
            digest(&src),
        );
    }

    #[test]
    fn test_blur_is_not_idempotent() {
        let mut executor = ChainExecutor::new();
        let src = test_image(16, 16);
        let blur = FilterParams::GaussianBlur {
            kernel_size: 5,
            sigma: 1.5,
        };
        let once = FilterChain::new().with(step(1, blur.clone()));
        let twice = FilterChain::new()
            .with(step(1, blur.clone()))
            .with(step(2, blur));
        assert_ne!(
            digest(&executor.apply_chain(&src, &once, None)),
            digest(&executor.apply_chain(&src, &twice, None)),
        );
    }

    #[test]
    fn test_cache_bound_and_fifo_survivorship() {
        let mut executor = ChainExecutor::new();
        assert_eq!(executor.cache_capacity(), 20);

        // 25 distinct sources under the same chain: 25 distinct keys
        let chain = FilterChain::new().with(step(1, FilterParams::Invert));
        for tag in 0..25u32 {
            let src = RasterBuffer::filled(8, 8, [tag as u8, 0, 0, 255]);
            executor.apply_chain(&src, &chain, None);
            assert!(executor.cache_len() <= 20);
        }
        assert_eq!(executor.cache_len(), 20);

        // Survivors are exactly the 20 most recently inserted: 5..25.
        // Replay newest-first so the misses at the end (0..5) cannot
        // evict entries before they are queried
        let misses_before = executor.cache_stats().misses;
        let hits_before = executor.cache_stats().hits;
        for tag in (0..25u32).rev() {
            let src = RasterBuffer::filled(8, 8, [tag as u8, 0, 0, 255]);
            executor.apply_chain(&src, &chain, None);
        }
        let stats = executor.cache_stats();
        assert_eq!(stats.hits - hits_before, 20);
        assert_eq!(stats.misses - misses_before, 5);
    }

    #[test]
    fn test_fail_soft_on_poisoned_step() {
        // An empty source makes every step fail; the executor must return
        // a valid duplicate, never panic or propagate
        let mut executor = ChainExecutor::new();
        let src = RasterBuffer::new(0, 0);
        let out = executor.apply_chain(&src, &mixed_chain(), None);
        assert_eq!(digest(&out), digest(&src));
    }

    // -----------------------------------------------------------------
    // Dispatcher integration
    // -----------------------------------------------------------------

    /// Accelerated stub that errors on every call.
    struct PoisonedBackend;

    impl AcceleratedBackend for PoisonedBackend {
        fn name(&self) -> &'static str {
            "poisoned"
        }
        fn supports(&self, _kind: FilterKind) -> bool {
            true
        }
        fn apply(&self, _src: &RasterBuffer, params: &FilterParams) -> VisionResult<RasterBuffer> {
            Err(VisionError::execution(
                "poisoned",
                params.kind().name(),
                "injected failure",
            ))
        }
    }

    /// Accelerated stub that flattens everything to mid-gray.
    struct FlattenBackend;

    impl AcceleratedBackend for FlattenBackend {
        fn name(&self) -> &'static str {
            "flatten"
        }
        fn supports(&self, kind: FilterKind) -> bool {
            kind == FilterKind::GaussianBlur
        }
        fn apply(&self, src: &RasterBuffer, _params: &FilterParams) -> VisionResult<RasterBuffer> {
            Ok(RasterBuffer::filled(
                src.width(),
                src.height(),
                [128, 128, 128, 255],
            ))
        }
    }

    #[test]
    fn test_poisoned_backend_never_changes_output() {
        let src = test_image(20, 20);

        let mut software = ChainExecutor::new();
        let expected = software.apply_chain(&src, &mixed_chain(), None);

        let dispatcher =
            FilterDispatcher::with_backend(Box::new(PoisonedBackend), BackendGate::open());
        let mut accelerated = ChainExecutor::with_dispatcher(dispatcher);
        let out = accelerated.apply_chain(&src, &mixed_chain(), None);

        assert_eq!(digest(&out), digest(&expected));
    }

    #[test]
    fn test_readiness_gate_switches_paths() {
        let src = test_image(12, 12);
        let chain = FilterChain::new().with(step(
            1,
            FilterParams::GaussianBlur {
                kernel_size: 5,
                sigma: 1.0,
            },
        ));

        let gate = BackendGate::new();
        let dispatcher = FilterDispatcher::with_backend(Box::new(FlattenBackend), gate.clone());
        let mut executor = ChainExecutor::with_dispatcher(dispatcher);

        // Gate closed: software result
        let before = executor.apply_chain(&src, &chain, None);
        let mut software = ChainExecutor::new();
        assert_eq!(
            digest(&before),
            digest(&software.apply_chain(&src, &chain, None)),
        );

        // Gate open: the stub's flat gray shows through. The chain
        // signature is unchanged, so clear the cache to force re-execution
        gate.mark_ready();
        executor.clear_cache();
        let after = executor.apply_chain(&src, &chain, None);
        assert_eq!(after.pixel(6, 6).unwrap(), [128, 128, 128, 255]);
        assert_ne!(digest(&after), digest(&before));
    }

    #[test]
    fn test_cache_hit_skips_recomputation() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};

        struct CountingBackend {
            calls: Arc<AtomicU32>,
        }

        impl AcceleratedBackend for CountingBackend {
            fn name(&self) -> &'static str {
                "counting"
            }
            fn supports(&self, _kind: FilterKind) -> bool {
                true
            }
            fn apply(&self, src: &RasterBuffer, params: &FilterParams) -> VisionResult<RasterBuffer> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                lux_filters::apply(src, params).map_err(|e| {
                    VisionError::execution("counting", params.kind().name(), e.to_string())
                })
            }
        }

        let calls = Arc::new(AtomicU32::new(0));
        let backend = CountingBackend {
            calls: Arc::clone(&calls),
        };
        let dispatcher = FilterDispatcher::with_backend(Box::new(backend), BackendGate::open());
        let mut executor = ChainExecutor::with_dispatcher(dispatcher);

        let src = test_image(16, 16);
        let chain = mixed_chain();
        executor.apply_chain(&src, &chain, None);
        let after_first = calls.load(Ordering::SeqCst);
        assert_eq!(after_first, 3);

        executor.apply_chain(&src, &chain, None);
        assert_eq!(calls.load(Ordering::SeqCst), after_first);
        assert_eq!(executor.cache_stats().hits, 1);
    }

    #[test]
    fn test_chain_roundtrips_through_json() {
        // UI interop: a chain serialized by an editor deserializes into
        // the same chain and produces the same output
        let chain = mixed_chain();
        let json = serde_json::to_string(&chain).unwrap();
        let back: FilterChain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chain);

        let src = test_image(16, 16);
        let mut executor = ChainExecutor::new();
        assert_eq!(
            digest(&executor.apply_chain(&src, &chain, None)),
            digest(&executor.apply_chain(&src, &back, None)),
        );
    }

    #[test]
    fn test_small_cache_capacity_is_honored() {
        let mut executor = ExecutorBuilder::new().cache_capacity(2).build();
        let chain = FilterChain::new().with(step(1, FilterParams::Invert));
        for tag in 0..5u32 {
            let src = RasterBuffer::filled(4, 4, [tag as u8, 0, 0, 255]);
            executor.apply_chain(&src, &chain, None);
        }
        assert_eq!(executor.cache_len(), 2);
    }
}
