//! Content Service
//!
//! Public façade over the reader, ledger and sync coordinator. Every fallible
//! operation answers with a [`ContentResult`] instead of an error.

use std::sync::Arc;

use tracing::warn;

use super::{ContentReader, SyncCoordinator, VersionLedger};
use crate::backend::ContentBackend;
use crate::cache::{self, CacheStats, CacheStore, SharedCache};
use crate::config::Config;
use crate::error::ContentResult;
use crate::models::{
    ContentFilters, ContentId, ContentKind, ContentVersion, LearningPath, LessonWithContent,
    LevelWithModules, ModuleWithLessons, SearchResults, SyncPayload,
};

#[derive(Clone)]
pub struct ContentService {
    reader: ContentReader,
    ledger: VersionLedger,
    sync: SyncCoordinator,
    cache: SharedCache,
}

impl ContentService {
    /// Builds the service around one shared cache.
    pub fn new(backend: Arc<dyn ContentBackend>, cache: SharedCache) -> Self {
        Self {
            reader: ContentReader::new(backend.clone(), cache.clone()),
            ledger: VersionLedger::new(backend.clone(), cache.clone()),
            sync: SyncCoordinator::new(backend, cache.clone()),
            cache,
        }
    }

    /// Builds the service with a fresh cache sized from configuration.
    pub fn from_config(backend: Arc<dyn ContentBackend>, config: &Config) -> Self {
        let store = CacheStore::new(config.max_entries, config.default_ttl());
        Self::new(backend, cache::shared(store))
    }

    /// Handle to the shared cache, for the background sweeper.
    pub fn cache(&self) -> SharedCache {
        self.cache.clone()
    }

    pub async fn get_levels_with_modules(
        &self,
        filters: &ContentFilters,
    ) -> ContentResult<Vec<LevelWithModules>> {
        self.reader.get_levels_with_modules(filters).await.into()
    }

    pub async fn get_module_with_lessons(
        &self,
        module_id: ContentId,
        filters: &ContentFilters,
    ) -> ContentResult<ModuleWithLessons> {
        self.reader
            .get_module_with_lessons(module_id, filters)
            .await
            .into()
    }

    pub async fn get_lesson_with_content(
        &self,
        lesson_id: ContentId,
        include_related: bool,
    ) -> ContentResult<LessonWithContent> {
        self.reader
            .get_lesson_with_content(lesson_id, include_related)
            .await
            .into()
    }

    pub async fn search_content(
        &self,
        term: &str,
        kinds: &[ContentKind],
        filters: &ContentFilters,
    ) -> ContentResult<SearchResults> {
        self.reader.search_content(term, kinds, filters).await.into()
    }

    pub async fn get_personalized_learning_path(
        &self,
        user_id: &str,
        target_level: i32,
    ) -> ContentResult<LearningPath> {
        self.reader
            .get_personalized_learning_path(user_id, target_level)
            .await
            .into()
    }

    pub async fn sync_content_updates(&self, last_sync: Option<&str>) -> ContentResult<SyncPayload> {
        self.sync.sync(last_sync).await.into()
    }

    pub async fn get_cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Drops every cached read; returns how many entries were removed.
    pub async fn clear_all_cache(&self) -> usize {
        self.cache.write().await.invalidate(None)
    }

    pub async fn current_version(
        &self,
        content_type: &str,
        content_id: ContentId,
    ) -> ContentResult<String> {
        self.ledger
            .current_version(content_type, content_id)
            .await
            .map(|v| v.to_string())
            .into()
    }

    /// Records a content change in the version ledger.
    ///
    /// Called after the content write itself succeeded. A ledger failure is
    /// logged and swallowed so it never fails that write.
    pub async fn record_content_change(
        &self,
        content_type: &str,
        content_id: ContentId,
        change_description: &str,
    ) -> Option<ContentVersion> {
        match self
            .ledger
            .record_change(content_type, content_id, change_description)
            .await
        {
            Ok(version) => Some(version),
            Err(err) => {
                warn!(content_type, content_id, error = %err, "content version not recorded");
                None
            }
        }
    }
}
