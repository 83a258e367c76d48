//! Cache Module
//!
//! In-memory content cache with TTL expiration, FIFO eviction and key derivation.

mod entry;
mod fifo;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use fifo::FifoTracker;
pub use key::derive_key;
pub use stats::{CacheCounters, CacheStats, EntryStats};
pub use store::CacheStore;

/// Cache handle shared between the reader, the ledger, the sync coordinator and the sweeper.
pub type SharedCache = Arc<RwLock<CacheStore>>;

// == Public Constants ==
/// Default number of entries before FIFO eviction kicks in
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default lifetime of a cached read
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Version tag applied to cached reads
pub const DEFAULT_VERSION: &str = "1.0";

/// Wraps a store for sharing across tasks.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
