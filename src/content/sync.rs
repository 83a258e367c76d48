//! Incremental Sync Coordinator
//!
//! Pulls every content row modified since the caller's cursor, then flushes
//! the whole cache so later reads observe the synced data.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::backend::{ContentBackend, RowQuery, Table};
use crate::cache::SharedCache;
use crate::error::{ContentError, Result};
use crate::models::content::decode_rows;
use crate::models::SyncPayload;

/// Cursor used when the caller has never synced
pub const EPOCH_CURSOR: &str = "1970-01-01T00:00:00Z";

#[derive(Clone)]
pub struct SyncCoordinator {
    backend: Arc<dyn ContentBackend>,
    cache: SharedCache,
}

impl SyncCoordinator {
    pub fn new(backend: Arc<dyn ContentBackend>, cache: SharedCache) -> Self {
        Self { backend, cache }
    }

    /// Fetches active rows updated at or after `last_sync` from all five content tables.
    ///
    /// The tables are queried concurrently. If any query fails the sync fails
    /// as a whole and the cache is left as it was. The returned `synced_at` is
    /// the caller's next cursor; it is not stored here.
    pub async fn sync(&self, last_sync: Option<&str>) -> Result<SyncPayload> {
        let since = parse_cursor(last_sync)?;
        let since = since.to_rfc3339_opts(SecondsFormat::Millis, true);

        let (levels, modules, lessons, vocabulary, grammar) = tokio::try_join!(
            self.changed(Table::Levels, &since),
            self.changed(Table::Modules, &since),
            self.changed(Table::Lessons, &since),
            self.changed(Table::Vocabulary, &since),
            self.changed(Table::GrammarRules, &since),
        )?;

        let payload = SyncPayload {
            levels,
            modules,
            lessons,
            vocabulary,
            grammar,
            synced_at: Utc::now(),
        };

        let flushed = self.cache.write().await.invalidate(None);
        info!(
            since = %since,
            rows = payload.total_rows(),
            flushed,
            "content sync complete"
        );

        Ok(payload)
    }

    async fn changed<T: DeserializeOwned>(&self, table: Table, since: &str) -> Result<Vec<T>> {
        let query = RowQuery::new()
            .gte("updated_at", since)
            .active()
            .order_by("updated_at", true);

        let rows = self.backend.select(table, &query).await?;
        decode_rows(table.name(), rows)
    }
}

/// Absent cursors mean "everything since the epoch".
pub fn parse_cursor(last_sync: Option<&str>) -> Result<DateTime<Utc>> {
    let raw = last_sync.unwrap_or(EPOCH_CURSOR);

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| ContentError::MalformedParameters(format!("invalid sync cursor '{raw}': {err}")))
}
