//! Request-side models: read filters, search kinds and HTTP request bodies.

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

// == Content Filters ==
/// Sorting, pagination and visibility options shared by the read operations.
///
/// The whole struct takes part in cache key derivation, so two reads differing
/// in any field are cached separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFilters {
    /// Column to sort by, `order_index` when unset
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Include soft-deleted rows
    pub include_inactive: bool,
    pub difficulty_level: Option<i32>,
}

impl ContentFilters {
    /// Resolves the sort column against the columns a table allows.
    pub fn sort_column(&self, allowed: &[&'static str]) -> Result<&'static str> {
        match self.sort_by.as_deref() {
            None => Ok("order_index"),
            Some(field) => allowed.iter().copied().find(|c| *c == field).ok_or_else(|| {
                ContentError::MalformedParameters(format!("cannot sort by '{field}'"))
            }),
        }
    }
}

// == Content Kind ==
/// Searchable content families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Lesson,
    Vocabulary,
    Grammar,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Lesson, ContentKind::Vocabulary, ContentKind::Grammar];

    /// Parses a comma separated list such as `lesson,grammar`.
    pub fn parse_list(raw: &str) -> Result<Vec<ContentKind>> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "lesson" | "lessons" => Ok(ContentKind::Lesson),
                "vocabulary" => Ok(ContentKind::Vocabulary),
                "grammar" => Ok(ContentKind::Grammar),
                other => Err(ContentError::MalformedParameters(format!(
                    "unknown content type '{other}'"
                ))),
            })
            .collect()
    }

    /// Sorted, deduplicated kinds; empty input means every kind.
    pub fn normalize(kinds: &[ContentKind]) -> Vec<ContentKind> {
        if kinds.is_empty() {
            return Self::ALL.to_vec();
        }
        let mut kinds = kinds.to_vec();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

// == HTTP Bodies ==
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub last_sync_timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordChangeRequest {
    pub change_description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonQuery {
    #[serde(default = "default_include_related")]
    pub include_related: bool,
}

fn default_include_related() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearningPathQuery {
    pub level: i32,
}

/// `/search` query string: term, kinds and the usual filters.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default)]
    pub difficulty_level: Option<i32>,
}

impl SearchQuery {
    pub fn kinds(&self) -> Result<Vec<ContentKind>> {
        ContentKind::parse_list(self.types.as_deref().unwrap_or(""))
    }

    pub fn filters(&self) -> ContentFilters {
        ContentFilters {
            limit: self.limit,
            offset: self.offset,
            include_inactive: self.include_inactive,
            difficulty_level: self.difficulty_level,
            ..ContentFilters::default()
        }
    }
}
