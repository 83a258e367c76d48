//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and version metadata.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cached payload with expiry and content version.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Content version this entry reflects (informational only)
    pub version: String,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub fn new(data: T, version: impl Into<String>, ttl: Duration) -> Self {
        Self::at(data, version, ttl, current_timestamp_ms())
    }

    /// Creates an entry with an explicit creation time.
    pub fn at(data: T, version: impl Into<String>, ttl: Duration, now: u64) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            data,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
            version: version.into(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry stays valid up to and including `expires_at`; it is expired
    /// only once the current time is strictly past it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was inserted.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at)
    }

    /// Remaining lifetime in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("payload".to_string(), "1.0", Duration::from_secs(60));

        assert_eq!(entry.data, "payload");
        assert_eq!(entry.version, "1.0");
        assert_eq!(entry.expires_at - entry.created_at, 60_000);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(1u32, "1.0", Duration::from_millis(20));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(40));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::at((), "1.0", Duration::from_millis(500), 1_000);

        assert!(!entry.is_expired_at(1_499));
        // Still valid exactly at the expiry instant
        assert!(!entry.is_expired_at(1_500));
        assert!(entry.is_expired_at(1_501));
    }

    #[test]
    fn test_zero_ttl_expires_after_instant() {
        let entry = CacheEntry::at((), "1.0", Duration::ZERO, 10);
        assert!(!entry.is_expired_at(10));
        assert!(entry.is_expired_at(11));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::at((), "1.0", Duration::MAX, 10);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired_at(u64::MAX));
    }

    #[test]
    fn test_age_grows() {
        let entry = CacheEntry::new((), "1.0", Duration::from_secs(10));
        sleep(Duration::from_millis(15));
        assert!(entry.age_ms() >= 15);
        assert!(entry.ttl_remaining_ms() <= 10_000 - 15);
    }
}
