//! Dual-backend dispatch: try accelerated, fall back to software.
//!
//! The dispatcher is the only place the accelerated path can fail, and
//! failure never leaves it. Whatever the backend does — error out, or
//! hand back a buffer with the wrong dimensions — the dispatcher logs a
//! warning and reruns the same filter with the same parameters through
//! the software library. The chain executor above only ever sees software
//! errors (in practice: an empty input buffer).

use lux_core::RasterBuffer;
use lux_filters::{FilterKind, FilterParams, FilterResult, apply};
use tracing::{debug, warn};

use crate::backend::{AcceleratedBackend, BackendGate};

/// Routes each filter call to the accelerated backend or the software
/// library.
pub struct FilterDispatcher {
    backend: Option<Box<dyn AcceleratedBackend>>,
    gate: BackendGate,
}

impl Default for FilterDispatcher {
    fn default() -> Self {
        Self::software_only()
    }
}

impl FilterDispatcher {
    /// A dispatcher with no accelerated backend; every call runs in
    /// software.
    pub fn software_only() -> Self {
        Self {
            backend: None,
            gate: BackendGate::new(),
        }
    }

    /// A dispatcher with an accelerated backend behind a readiness gate.
    ///
    /// Until the gate opens, all calls run in software.
    pub fn with_backend(backend: Box<dyn AcceleratedBackend>, gate: BackendGate) -> Self {
        Self {
            backend: Some(backend),
            gate,
        }
    }

    /// The readiness gate handle.
    pub fn gate(&self) -> &BackendGate {
        &self.gate
    }

    /// Name of the installed accelerated backend, if any.
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    /// Whether the given kind currently has a live accelerated path.
    pub fn supports(&self, kind: FilterKind) -> bool {
        match &self.backend {
            Some(b) => self.gate.is_ready() && b.supports(kind),
            None => false,
        }
    }

    /// One-line description of the dispatch configuration.
    pub fn describe(&self) -> String {
        match &self.backend {
            Some(b) if self.gate.is_ready() => format!("{} + software fallback", b.name()),
            Some(b) => format!("software ({} initializing)", b.name()),
            None => "software".to_string(),
        }
    }

    /// Applies one filter, preferring the accelerated path.
    pub fn dispatch(&self, src: &RasterBuffer, params: &FilterParams) -> FilterResult<RasterBuffer> {
        if let Some(backend) = &self.backend {
            if self.gate.is_ready() && backend.supports(params.kind()) {
                match backend.apply(src, params) {
                    Ok(out) if src.ensure_same_size(&out).is_ok() => {
                        debug!(
                            backend = backend.name(),
                            filter = params.kind().name(),
                            "accelerated"
                        );
                        return Ok(out);
                    }
                    Ok(out) => {
                        warn!(
                            backend = backend.name(),
                            filter = params.kind().name(),
                            got_width = out.width(),
                            got_height = out.height(),
                            "accelerated output has wrong dimensions, using software"
                        );
                    }
                    Err(err) => {
                        warn!(
                            backend = backend.name(),
                            filter = params.kind().name(),
                            error = %err,
                            "accelerated path failed, using software"
                        );
                    }
                }
            }
        }
        apply(src, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{VisionError, VisionResult};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Backend that claims everything and always fails.
    struct FailingBackend {
        calls: AtomicU32,
    }

    impl FailingBackend {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    impl AcceleratedBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing-stub"
        }
        fn supports(&self, _kind: FilterKind) -> bool {
            true
        }
        fn apply(&self, _src: &RasterBuffer, params: &FilterParams) -> VisionResult<RasterBuffer> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(VisionError::execution(
                "failing-stub",
                params.kind().name(),
                "poisoned",
            ))
        }
    }

    /// Backend that returns a recognizable constant buffer.
    struct ConstantBackend;

    impl AcceleratedBackend for ConstantBackend {
        fn name(&self) -> &'static str {
            "constant-stub"
        }
        fn supports(&self, kind: FilterKind) -> bool {
            kind == FilterKind::Invert
        }
        fn apply(&self, src: &RasterBuffer, _params: &FilterParams) -> VisionResult<RasterBuffer> {
            Ok(RasterBuffer::filled(src.width(), src.height(), [7, 7, 7, 255]))
        }
    }

    /// Backend whose output loses a row.
    struct ShrinkingBackend;

    impl AcceleratedBackend for ShrinkingBackend {
        fn name(&self) -> &'static str {
            "shrinking-stub"
        }
        fn supports(&self, _kind: FilterKind) -> bool {
            true
        }
        fn apply(&self, src: &RasterBuffer, _params: &FilterParams) -> VisionResult<RasterBuffer> {
            Ok(RasterBuffer::new(src.width(), src.height() - 1))
        }
    }

    #[test]
    fn test_failure_falls_back_to_software() {
        let src = RasterBuffer::filled(6, 6, [10, 20, 30, 255]);
        let backend = FailingBackend::new();
        let dispatcher = FilterDispatcher::with_backend(Box::new(backend), BackendGate::open());

        let out = dispatcher.dispatch(&src, &FilterParams::Invert).unwrap();
        let expected = apply(&src, &FilterParams::Invert).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_closed_gate_skips_backend() {
        let src = RasterBuffer::filled(4, 4, [10, 20, 30, 255]);
        let dispatcher =
            FilterDispatcher::with_backend(Box::new(ConstantBackend), BackendGate::new());

        // Gate closed: software result, not the stub's constant
        let out = dispatcher.dispatch(&src, &FilterParams::Invert).unwrap();
        assert_eq!(out.pixel(0, 0).unwrap(), [245, 235, 225, 255]);

        dispatcher.gate().mark_ready();
        let out = dispatcher.dispatch(&src, &FilterParams::Invert).unwrap();
        assert_eq!(out.pixel(0, 0).unwrap(), [7, 7, 7, 255]);
    }

    #[test]
    fn test_uncovered_kind_goes_to_software() {
        let src = RasterBuffer::filled(4, 4, [200, 100, 50, 255]);
        let dispatcher =
            FilterDispatcher::with_backend(Box::new(ConstantBackend), BackendGate::open());

        // ConstantBackend only covers Invert
        assert!(dispatcher.supports(FilterKind::Invert));
        assert!(!dispatcher.supports(FilterKind::Grayscale));
        let out = dispatcher.dispatch(&src, &FilterParams::Grayscale).unwrap();
        let px = out.pixel(0, 0).unwrap();
        assert_eq!(px[0], px[1]);
    }

    #[test]
    fn test_dimension_drift_falls_back() {
        let src = RasterBuffer::filled(5, 5, [80, 80, 80, 255]);
        let dispatcher =
            FilterDispatcher::with_backend(Box::new(ShrinkingBackend), BackendGate::open());

        let out = dispatcher.dispatch(&src, &FilterParams::Invert).unwrap();
        assert_eq!(out.height(), 5);
        assert_eq!(out.pixel(0, 0).unwrap(), [175, 175, 175, 255]);
    }

    #[test]
    fn test_software_only_describe() {
        let dispatcher = FilterDispatcher::software_only();
        assert_eq!(dispatcher.describe(), "software");
        assert_eq!(dispatcher.backend_name(), None);
        assert!(!dispatcher.supports(FilterKind::GaussianBlur));
    }
}
