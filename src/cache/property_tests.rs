//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check expiry, eviction, invalidation and key derivation.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use serde_json::json;

use crate::cache::{derive_key, CacheEntry, CacheStore};

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys in the shape the content reader produces
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,16}:[a-z0-9]{0,16}".prop_map(|s| s)
}

fn unique_keys(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(key_strategy(), min..max).prop_map(|set| set.into_iter().collect())
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: u32 },
    Get { key: String },
    Invalidate { pattern: Option<String> },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        prop::option::of("[a-z_]{1,4}").prop_map(|pattern| CacheOp::Invalidate { pattern }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // An entry inserted with ttl T is readable just before T elapses and gone just after.
    #[test]
    fn prop_expiry_boundary(
        inserted_at in 0u64..1_000_000_000,
        ttl_ms in 1u64..86_400_000,
        epsilon in 1u64..1_000
    ) {
        let entry = CacheEntry::at((), "1.0", Duration::from_millis(ttl_ms), inserted_at);
        let before = (inserted_at + ttl_ms).saturating_sub(epsilon).max(inserted_at);

        prop_assert!(!entry.is_expired_at(before));
        prop_assert!(entry.is_expired_at(inserted_at + ttl_ms + epsilon));
    }

    // Inserting capacity + 1 distinct keys evicts only the first one.
    #[test]
    fn prop_fifo_eviction(keys in unique_keys(2, 40), extra in "[A-Z]{1,8}") {
        let capacity = keys.len();
        let mut store: CacheStore<u32> = CacheStore::new(capacity, TEST_DEFAULT_TTL);

        for (i, key) in keys.iter().enumerate() {
            store.put(key.clone(), i as u32, None, None);
        }
        store.put(extra.clone(), 0, None, None);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(store.get(&keys[0]).is_none(), "first key should be evicted");
        for key in keys.iter().skip(1) {
            prop_assert!(store.get(key).is_some(), "key '{}' should survive", key);
        }
        prop_assert!(store.get(&extra).is_some());
    }

    // Reads never change which key is evicted next.
    #[test]
    fn prop_reads_do_not_reorder(keys in unique_keys(2, 20), reads in prop::collection::vec(any::<prop::sample::Index>(), 0..30)) {
        let capacity = keys.len();
        let mut store: CacheStore<u32> = CacheStore::new(capacity, TEST_DEFAULT_TTL);

        for key in &keys {
            store.put(key.clone(), 1, None, None);
        }
        for idx in reads {
            store.get(idx.get::<String>(&keys));
        }
        store.put("NEW".to_string(), 2, None, None);

        prop_assert!(store.get(&keys[0]).is_none());
    }

    // The store never holds more than its capacity.
    #[test]
    fn prop_capacity_enforcement(ops in prop::collection::vec(cache_op_strategy(), 1..200)) {
        let max_entries = 16;
        let mut store: CacheStore<u32> = CacheStore::new(max_entries, TEST_DEFAULT_TTL);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => store.put(key, value, None, None),
                CacheOp::Get { key } => { store.get(&key); }
                CacheOp::Invalidate { pattern } => { store.invalidate(pattern.as_deref()); }
            }
            prop_assert!(store.len() <= max_entries);
            prop_assert_eq!(store.stats().size, store.len());
        }
    }

    // Pattern invalidation removes exactly the keys containing the pattern.
    #[test]
    fn prop_pattern_invalidation(keys in unique_keys(1, 40), pattern in "[a-z_]{1,3}") {
        let mut store: CacheStore<u32> = CacheStore::new(100, TEST_DEFAULT_TTL);
        for key in &keys {
            store.put(key.clone(), 1, None, None);
        }

        store.invalidate(Some(&pattern));

        for key in &keys {
            let present = store.get(key).is_some();
            prop_assert_eq!(present, !key.contains(&pattern), "key '{}'", key);
        }
    }

    // Hits and misses add up to the number of reads.
    #[test]
    fn prop_counters_match_reads(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store: CacheStore<u32> = CacheStore::new(100, TEST_DEFAULT_TTL);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => store.put(key, value, None, None),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate { pattern } => { store.invalidate(pattern.as_deref()); }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
    }

    // Key derivation is a pure function of operation and params.
    #[test]
    fn prop_key_determinism(op in "[a-z_]{1,20}", a in any::<i64>(), b in any::<i64>(), c in any::<i64>()) {
        let first = derive_key(&op, Some(&json!({"a": a, "b": b})));
        let again = derive_key(&op, Some(&json!({"b": b, "a": a})));
        prop_assert_eq!(&first, &again);

        prop_assume!(b != c);
        let other = derive_key(&op, Some(&json!({"a": a, "b": c})));
        prop_assert_ne!(first, other);
    }
}

#[test]
fn test_unique_keys_strategy_is_unique() {
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    let mut runner = TestRunner::default();
    let keys = unique_keys(5, 10).new_tree(&mut runner).unwrap().current();
    let set: HashSet<&String> = keys.iter().collect();
    assert_eq!(set.len(), keys.len());
}
