//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use content_cache::backend::{ContentSeed, InMemoryBackend};
use content_cache::cache::{shared, CacheStore};
use content_cache::ContentService;

const SEED: &str = include_str!("../fixtures/content_seed.json");

pub fn seeded_backend() -> Arc<InMemoryBackend> {
    let seed = ContentSeed::from_json(SEED).expect("fixture seed parses");
    Arc::new(InMemoryBackend::from_seed(seed))
}

/// Service over the fixture content with a cache of the given TTL.
pub fn service_with_ttl(ttl: Duration) -> (ContentService, Arc<InMemoryBackend>) {
    let backend = seeded_backend();
    let service = ContentService::new(backend.clone(), shared(CacheStore::new(100, ttl)));
    (service, backend)
}

pub fn service() -> (ContentService, Arc<InMemoryBackend>) {
    service_with_ttl(Duration::from_secs(300))
}
