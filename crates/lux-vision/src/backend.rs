//! The accelerated backend trait and its readiness gate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lux_core::RasterBuffer;
use lux_filters::{FilterKind, FilterParams};

use crate::error::VisionResult;

/// An accelerated implementation of some subset of the filter kinds.
///
/// Implementations are thin adapters over a native vision library: they
/// convert the buffer into the library's matrix form, invoke the
/// equivalent primitive, and convert back. An implementation may cover
/// any subset of kinds; [`supports`](AcceleratedBackend::supports) is
/// consulted before every call.
pub trait AcceleratedBackend: Send + Sync {
    /// Backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this backend accelerates the given filter kind.
    fn supports(&self, kind: FilterKind) -> bool;

    /// Runs one filter. The output must have the input's dimensions.
    fn apply(&self, src: &RasterBuffer, params: &FilterParams) -> VisionResult<RasterBuffer>;
}

/// Shared readiness flag for an accelerated backend.
///
/// The backend's one-time initialization happens outside this core, on
/// some asynchronous path; it holds a clone of the gate and flips it when
/// initialization finishes. The dispatcher checks the gate before every
/// call and never blocks on it — until the flag is set, every filter
/// silently takes the software path.
#[derive(Debug, Clone, Default)]
pub struct BackendGate {
    ready: Arc<AtomicBool>,
}

impl BackendGate {
    /// Creates a gate in the not-ready state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gate that is already open.
    pub fn open() -> Self {
        let gate = Self::new();
        gate.mark_ready();
        gate
    }

    /// Whether the backend has finished initializing.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Marks the backend ready. Called once by the external initializer.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_closed() {
        let gate = BackendGate::new();
        assert!(!gate.is_ready());
    }

    #[test]
    fn test_gate_clones_share_state() {
        let gate = BackendGate::new();
        let handle = gate.clone();
        handle.mark_ready();
        assert!(gate.is_ready());
    }

    #[test]
    fn test_open_gate() {
        assert!(BackendGate::open().is_ready());
    }
}
