//! Error types for filter execution.

use thiserror::Error;

/// Error type for filter execution.
///
/// Filter *parameters* are never an error: every parameter set is clamped
/// into its valid domain before use. What can fail is the buffer a filter
/// is asked to run on.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The input buffer contains no pixels.
    #[error("filter input is empty ({width}x{height})")]
    EmptyInput {
        /// Input width
        width: u32,
        /// Input height
        height: u32,
    },

    /// Buffer-level failure from lux-core.
    #[error(transparent)]
    Core(#[from] lux_core::Error),
}

/// Result type for filter execution.
pub type FilterResult<T> = Result<T, FilterError>;
