//! Error types for the accelerated backend path.
//!
//! Nothing here escapes the dispatcher: every variant is caught at the
//! dispatch boundary, logged, and compensated by the software
//! implementation of the same filter.

use thiserror::Error;

/// Result type alias using [`VisionError`] as the error type.
pub type VisionResult<T> = std::result::Result<T, VisionError>;

/// Errors from an accelerated backend.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The backend could not be constructed or is not usable.
    #[error("accelerated backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend has no implementation for this filter kind.
    #[error("backend {backend} does not accelerate {filter}")]
    Unsupported {
        /// Backend name
        backend: &'static str,
        /// Filter kind name
        filter: &'static str,
    },

    /// The backend failed while executing a filter.
    #[error("backend {backend} failed on {filter}: {reason}")]
    Execution {
        /// Backend name
        backend: &'static str,
        /// Filter kind name
        filter: &'static str,
        /// Underlying failure description
        reason: String,
    },
}

impl VisionError {
    /// Creates a [`VisionError::Execution`] error.
    #[inline]
    pub fn execution(backend: &'static str, filter: &'static str, reason: impl Into<String>) -> Self {
        Self::Execution {
            backend,
            filter,
            reason: reason.into(),
        }
    }
}
