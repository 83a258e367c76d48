//! FIFO Tracker Module
//!
//! Tracks insertion order for first-in-first-out cache eviction.

use std::collections::VecDeque;

// == FIFO Tracker ==
/// Tracks key insertion order for FIFO eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion
/// - Back = Newest insertion
///
/// Reads never reorder keys, and re-inserting a tracked key keeps its
/// original position.
#[derive(Debug, Default)]
pub struct FifoTracker {
    /// Keys in insertion order
    order: VecDeque<String>,
}

impl FifoTracker {
    // == Constructor ==
    /// Creates a new empty FIFO tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Insert ==
    /// Appends a key as the newest insertion if it is not already tracked.
    pub fn record_insert(&mut self, key: &str) {
        if !self.contains(key) {
            self.order.push_back(key.to_string());
        }
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    /// Removes every key matching the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.order.retain(|k| keep(k.as_str()));
    }

    // == Evict Oldest ==
    /// Returns and removes the earliest inserted key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Returns the earliest inserted key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }

    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }
}
