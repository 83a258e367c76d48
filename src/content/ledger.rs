//! Content Version Ledger
//!
//! Append-only record of content changes. The current version of a
//! `(content_type, content_id)` pair is its most recently appended row.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::{ContentBackend, Row, RowQuery, Table};
use crate::cache::SharedCache;
use crate::error::{ContentError, Result};
use crate::models::content::decode_rows;
use crate::models::{ContentId, ContentVersion};

/// Version of content that has never been changed
pub const INITIAL_VERSION: Version = Version { major: 1, minor: 0 };

// == Version ==
/// `major.minor` content version. Only `minor` is bumped by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// The following minor version. Fails once `minor` is exhausted.
    pub fn next_minor(self) -> Result<Self> {
        let minor = self.minor.checked_add(1).ok_or_else(|| {
            ContentError::MalformedParameters(format!("version {self} has no next minor"))
        })?;
        Ok(Self {
            major: self.major,
            minor,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || ContentError::MalformedParameters(format!("invalid version '{s}'"));
        let (major, minor) = s.trim().split_once('.').ok_or_else(malformed)?;

        Ok(Self {
            major: major.parse().map_err(|_| malformed())?,
            minor: minor.parse().map_err(|_| malformed())?,
        })
    }
}

// == Version Ledger ==
#[derive(Clone)]
pub struct VersionLedger {
    backend: Arc<dyn ContentBackend>,
    cache: SharedCache,
}

impl VersionLedger {
    pub fn new(backend: Arc<dyn ContentBackend>, cache: SharedCache) -> Self {
        Self { backend, cache }
    }

    /// Latest version of the content, `1.0` when it has never changed.
    pub async fn current_version(&self, content_type: &str, content_id: ContentId) -> Result<Version> {
        // Ids are assigned in append order, so the highest id is the newest row
        let query = RowQuery::new()
            .eq("content_type", content_type)
            .eq("content_id", content_id)
            .order_by("id", false)
            .limit(1);

        let rows = self.backend.select(Table::ContentVersions, &query).await?;
        match decode_rows::<ContentVersion>(Table::ContentVersions.name(), rows)?.first() {
            Some(row) => row.version.parse(),
            None => Ok(INITIAL_VERSION),
        }
    }

    /// Appends a row with the next minor version, then drops cached reads
    /// mentioning `content_type`.
    ///
    /// Nothing is invalidated when the ledger read or write fails.
    pub async fn record_change(
        &self,
        content_type: &str,
        content_id: ContentId,
        change_description: &str,
    ) -> Result<ContentVersion> {
        let next = self.current_version(content_type, content_id).await?.next_minor()?;

        let mut row = Row::new();
        row.insert("content_type".into(), Value::from(content_type));
        row.insert("content_id".into(), Value::from(content_id));
        row.insert("version".into(), Value::from(next.to_string()));
        row.insert("change_description".into(), Value::from(change_description));
        row.insert(
            "created_at".into(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        let stored = self.backend.insert(Table::ContentVersions, row).await?;
        let recorded = decode_rows::<ContentVersion>(Table::ContentVersions.name(), vec![stored])?
            .remove(0);

        info!(content_type, content_id, version = %recorded.version, "content version recorded");
        self.invalidate(content_type).await;

        Ok(recorded)
    }

    async fn invalidate(&self, content_type: &str) {
        let removed = self.cache.write().await.invalidate(Some(content_type));
        debug!(content_type, removed, "invalidated cached reads");
    }
}
