//! Cache statistics

use serde::{Deserialize, Serialize};

/// Lookup and eviction counters for a single cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hit_count: u64,
    pub miss_count: u64,
    /// Entries dropped to make room for an insert
    pub eviction_count: u64,
}

impl CacheStats {
    /// Fraction of lookups that were hits, or 0.0 before any lookup
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hit_count + self.miss_count;
        if lookups == 0 {
            0.0
        } else {
            self.hit_count as f64 / lookups as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hit_count += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.miss_count += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.eviction_count += 1;
    }
}
