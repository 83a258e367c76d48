//! Cache Statistics Module
//!
//! Introspection snapshot of the cache plus running hit/miss/eviction counters.

use serde::Serialize;

// == Cache Counters ==
/// Running performance counters kept by the store.
#[derive(Debug, Clone, Default)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Entry Stats ==
/// Per-entry view exposed by [`CacheStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryStats {
    pub key: String,
    pub version: String,
    pub age_ms: u64,
}

// == Cache Stats ==
/// Point-in-time snapshot of the cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Entries from oldest to newest insertion
    pub entries: Vec<EntryStats>,
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries evicted to respect capacity
    pub evictions: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl CacheStats {
    /// Builds a snapshot from the entry list and counters.
    pub fn new(entries: Vec<EntryStats>, counters: &CacheCounters) -> Self {
        let total = counters.hits + counters.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            counters.hits as f64 / total as f64
        };

        Self {
            size: entries.len(),
            entries,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            hit_rate,
        }
    }
}
