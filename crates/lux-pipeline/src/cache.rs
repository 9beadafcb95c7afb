//! Bounded FIFO cache of processed chain results.
//!
//! Eviction is strictly insertion-ordered: a hit does not refresh an
//! entry's position, so the survivors after overflow are always the most
//! recently *inserted* entries. Eviction drops the owned buffer on the
//! spot — release is deterministic, not deferred to some later sweep.

use std::collections::{HashMap, VecDeque};

use lux_core::RasterBuffer;

use crate::signature::CacheKey;

/// Default number of cached results.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// Hit/miss counters for cache introspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, in `[0.0, 1.0]`.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// FIFO-bounded store of final chain outputs.
pub struct ResultCache {
    entries: HashMap<CacheKey, RasterBuffer>,
    /// Insertion order; front = oldest.
    order: VecDeque<CacheKey>,
    capacity: usize,
    stats: CacheStats,
}

impl ResultCache {
    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Looks up a cached result. Does not affect eviction order.
    pub fn get(&mut self, key: &CacheKey) -> Option<&RasterBuffer> {
        match self.entries.get(key) {
            Some(buffer) => {
                self.stats.hits += 1;
                Some(buffer)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Inserts a result, evicting oldest-first past capacity.
    pub fn insert(&mut self, key: CacheKey, buffer: RasterBuffer) {
        // Re-inserting an existing key refreshes its position
        if self.entries.remove(&key).is_some() {
            self.order.retain(|k| k != &key);
        }
        while self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                if let Some(evicted) = self.entries.remove(&oldest) {
                    // Backing storage is freed here, not at a later sweep
                    drop(evicted);
                }
            } else {
                break;
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, buffer);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drops every entry. Counters are kept; [`reset_stats`] clears them.
    ///
    /// [`reset_stats`]: ResultCache::reset_stats
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Zeroes the hit/miss counters.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
