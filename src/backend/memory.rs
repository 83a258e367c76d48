//! In-memory backend
//!
//! Holds content tables in process. Supports the full query contract, an
//! outage switch per table, and call counters for observing cache behavior.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{sort_cmp, ContentBackend, Row, RowQuery, Table};
use crate::error::{ContentError, Result};

/// Initial table contents, deserializable from `{"levels": [...], "lessons": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ContentSeed(pub HashMap<Table, Vec<Row>>);

impl ContentSeed {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// == In-Memory Backend ==
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    unavailable: RwLock<HashSet<Table>>,
    selects: AtomicUsize,
    inserts: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: ContentSeed) -> Self {
        Self {
            tables: RwLock::new(seed.0),
            ..Self::default()
        }
    }

    /// Replaces the rows of one table.
    pub async fn load(&self, table: Table, rows: Vec<Row>) {
        self.tables.write().await.insert(table, rows);
    }

    /// Makes every call touching `table` fail until switched back.
    pub async fn set_unavailable(&self, table: Table, unavailable: bool) {
        let mut tables = self.unavailable.write().await;
        if unavailable {
            tables.insert(table);
        } else {
            tables.remove(&table);
        }
    }

    /// Number of `select` calls served so far.
    pub fn select_count(&self) -> usize {
        self.selects.load(AtomicOrdering::SeqCst)
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(AtomicOrdering::SeqCst)
    }

    /// Raw rows of a table, in storage order.
    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    async fn ensure_available(&self, table: Table) -> Result<()> {
        if self.unavailable.read().await.contains(&table) {
            return Err(ContentError::RemoteUnavailable(format!(
                "table '{table}' is unreachable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentBackend for InMemoryBackend {
    async fn select(&self, table: Table, query: &RowQuery) -> Result<Vec<Row>> {
        self.selects.fetch_add(1, AtomicOrdering::SeqCst);
        self.ensure_available(table).await?;

        if query.limit == Some(0) {
            return Err(ContentError::MalformedParameters(
                "limit must be greater than zero".to_string(),
            ));
        }

        let mut rows: Vec<Row> = self
            .tables
            .read()
            .await
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(&order.column).unwrap_or(&Value::Null);
                let b = b.get(&order.column).unwrap_or(&Value::Null);
                // Nulls sort last in both directions
                match (a.is_null(), b.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => {
                        let ord = sort_cmp(a, b);
                        if order.ascending {
                            ord
                        } else {
                            ord.reverse()
                        }
                    }
                }
            });
        }

        let rows: Vec<Row> = rows
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        debug!(%table, rows = rows.len(), "select");
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row> {
        self.inserts.fetch_add(1, AtomicOrdering::SeqCst);
        self.ensure_available(table).await?;

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();

        if !row.contains_key("id") {
            let next_id = rows
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_i64))
                .max()
                .unwrap_or(0)
                + 1;
            row.insert("id".to_string(), Value::from(next_id));
        }
        row.entry("created_at").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        });

        rows.push(row.clone());
        Ok(row)
    }
}
