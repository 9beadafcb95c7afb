//! # lux-vision
//!
//! Accelerated backend adapter and dual-backend dispatcher for the LUX
//! pipeline.
//!
//! The [`FilterDispatcher`] routes each filter call either to an
//! [`AcceleratedBackend`] (a thin adapter over a native vision library)
//! or to the software implementations in `lux-filters`. Selection is a
//! runtime capability check: the backend must be installed, its
//! [`BackendGate`] must report ready, and it must cover the filter kind.
//! An accelerated failure of any sort is logged and silently compensated
//! by the software path — it never reaches the chain executor.
//!
//! The OpenCV adapter compiles only with the non-default `opencv`
//! feature; a default build has no accelerated backend and the dispatcher
//! runs everything in software.
//!
//! ## Usage
//!
//! ```rust
//! use lux_core::RasterBuffer;
//! use lux_filters::FilterParams;
//! use lux_vision::FilterDispatcher;
//!
//! let dispatcher = FilterDispatcher::software_only();
//! let src = RasterBuffer::filled(8, 8, [64, 64, 64, 255]);
//! let out = dispatcher.dispatch(&src, &FilterParams::Invert).unwrap();
//! assert_eq!(out.pixel(0, 0).unwrap(), [191, 191, 191, 255]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backend;
pub mod dispatch;
pub mod error;

#[cfg(feature = "opencv")]
pub mod opencv_backend;

pub use backend::{AcceleratedBackend, BackendGate};
pub use dispatch::FilterDispatcher;
pub use error::{VisionError, VisionResult};

#[cfg(feature = "opencv")]
pub use opencv_backend::OpenCvBackend;
