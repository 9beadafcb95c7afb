//! Cache keys: a cheap content signature plus a serialized chain
//! signature.
//!
//! The content signature is deliberately weak: dimensions plus a sparse
//! byte sample. Two different images *can* collide — a collision costs a
//! stale cache hit, which is a performance artifact, never a correctness
//! one for the image the signature was actually computed from. What makes
//! the cache sound is determinism of the pipeline, not strength of the
//! hash, so nothing cryptographic is warranted.
//!
//! The chain signature is exact, not sampled: it is the serialized
//! normalized parameter list of the enabled steps, so any parameter
//! change produces a distinct key.

use lux_core::RasterBuffer;
use lux_filters::{FilterChain, FilterParams};

/// Default sampling stride through the raw byte buffer.
///
/// Prime, so consecutive samples walk through all four channels instead
/// of landing on the same one every time (any multiple of 4 would sample
/// a single channel).
pub const DEFAULT_SAMPLE_STRIDE: usize = 4093;

/// Weak identity of an image's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentSignature {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl ContentSignature {
    /// Samples a buffer with the given stride.
    ///
    /// Returns `None` for an empty buffer — there is nothing to sample,
    /// and the executor treats the result as uncacheable.
    pub fn sample(buffer: &RasterBuffer, stride: usize) -> Option<Self> {
        if buffer.is_empty() {
            return None;
        }
        let stride = stride.max(1);
        Some(Self {
            width: buffer.width(),
            height: buffer.height(),
            samples: buffer.data().iter().step_by(stride).copied().collect(),
        })
    }
}

/// Exact identity of the enabled portion of a chain.
pub type ChainSignature = String;

/// Serializes the enabled steps' normalized parameters.
///
/// Returns `None` if serialization fails; the executor then skips
/// caching rather than risk aliasing distinct chains under one key.
pub fn chain_signature(chain: &FilterChain) -> Option<ChainSignature> {
    let normalized: Vec<FilterParams> = chain
        .enabled_steps()
        .iter()
        .map(|step| step.params.normalized())
        .collect();
    serde_json::to_string(&normalized).ok()
}

/// Full cache key for one `(source, chain)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Content half of the key.
    pub content: ContentSignature,
    /// Chain half of the key.
    pub chain: ChainSignature,
}
