//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with FIFO tracking and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{
    CacheCounters, CacheEntry, CacheStats, EntryStats, FifoTracker, DEFAULT_MAX_ENTRIES,
    DEFAULT_TTL, DEFAULT_VERSION,
};

// == Cache Store ==
/// Bounded key-value store with FIFO eviction and TTL expiry.
///
/// The content layer stores JSON payloads, hence the default type parameter.
#[derive(Debug)]
pub struct CacheStore<T = Value> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Insertion order tracker
    fifo: FifoTracker,
    /// Hit/miss/eviction counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL used when `put` gets none
    default_ttl: Duration,
}

impl<T: Clone> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// A capacity of zero is raised to one so an insert can always land.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            fifo: FifoTracker::new(),
            counters: CacheCounters::default(),
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    // == Put ==
    /// Inserts or overwrites the entry for `key`.
    ///
    /// A new key arriving at capacity evicts the earliest inserted entry first.
    /// Overwriting keeps the key's original insertion position and resets its TTL.
    pub fn put(&mut self, key: impl Into<String>, data: T, version: Option<&str>, ttl: Option<Duration>) {
        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.fifo.evict_oldest() {
                self.entries.remove(&evicted);
                self.counters.record_eviction();
                debug!(key = %evicted, "cache eviction");
            }
        }

        let entry = CacheEntry::new(
            data,
            version.unwrap_or(DEFAULT_VERSION),
            ttl.unwrap_or(self.default_ttl),
        );
        self.entries.insert(key.clone(), entry);
        self.fifo.record_insert(&key);
    }

    // == Get ==
    /// Returns the payload if present and unexpired.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let data = entry.data.clone();
                self.counters.record_hit();
                return Some(data);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove(key);
            debug!(key, "cache entry expired");
        }
        self.counters.record_miss();
        None
    }

    // == Invalidate ==
    /// Drops every entry whose key contains `pattern`, or everything when `pattern` is `None`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, pattern: Option<&str>) -> usize {
        let before = self.entries.len();

        match pattern {
            None => {
                self.entries.clear();
                self.fifo.clear();
            }
            Some(pattern) => {
                self.entries.retain(|key, _| !key.contains(pattern));
                self.fifo.retain(|key| !key.contains(pattern));
            }
        }

        before - self.entries.len()
    }

    // == Stats ==
    /// Returns a snapshot of the store without mutating it.
    pub fn stats(&self) -> CacheStats {
        let entries = self
            .fifo
            .iter()
            .filter_map(|key| {
                self.entries.get(key).map(|entry| EntryStats {
                    key: key.clone(),
                    version: entry.version.clone(),
                    age_ms: entry.age_ms(),
                })
            })
            .collect();

        CacheStats::new(entries, &self.counters)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove(key);
        }

        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.fifo.remove(key);
    }
}
