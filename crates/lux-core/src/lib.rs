//! # lux-core
//!
//! Core types for the LUX filter-processing pipeline.
//!
//! This crate provides the foundational types used throughout the LUX
//! workspace:
//!
//! - [`RasterBuffer`] - Owned width × height × RGBA8 pixel buffer, the unit
//!   exchanged between filter steps
//! - [`Error`] / [`Result`] - Shared error handling
//! - [`pixel`] - Luminance weights and channel helpers
//!
//! ## Crate Structure
//!
//! `lux-core` has no internal dependencies. All other LUX crates depend
//! on it:
//!
//! ```text
//! lux-core (this crate)
//!    ^
//!    |
//!    +-- lux-filters (software filter library)
//!    +-- lux-vision (accelerated backend + dispatcher)
//!    +-- lux-pipeline (chain executor + cache)
//! ```
//!
//! ## Ownership Model
//!
//! A [`RasterBuffer`] owns its pixels outright. Filter steps never mutate
//! their input; they allocate a new buffer, and [`RasterBuffer::duplicate`]
//! always yields an independent allocation. This is what lets the chain
//! executor hand the caller's source image back untouched when a step
//! fails mid-chain.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;

pub use buffer::RasterBuffer;
pub use error::{Error, Result};
pub use pixel::{BT601_LUMA_B, BT601_LUMA_G, BT601_LUMA_R, clamp_u8, luminance, luminance_u8};
