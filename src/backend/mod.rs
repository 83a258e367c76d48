//! Backend Module
//!
//! Data contract of the hosted content database: tables, row queries and the
//! async trait the content layer reads and writes through.
//!
//! # Implementations
//! - [`InMemoryBackend`]: seedable in-process tables, used by tests and the bundled server

mod memory;
mod query;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

pub use memory::{ContentSeed, InMemoryBackend};
pub use query::{compare_values, sort_cmp, Filter, Order, RowQuery};

/// One backend row, column name to JSON value.
pub type Row = Map<String, Value>;

// == Tables ==
/// Tables the content layer touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Levels,
    Modules,
    Lessons,
    Vocabulary,
    GrammarRules,
    Questions,
    LessonVocabulary,
    LessonGrammar,
    ContentVersions,
    UserProgress,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Levels => "levels",
            Table::Modules => "modules",
            Table::Lessons => "lessons",
            Table::Vocabulary => "vocabulary",
            Table::GrammarRules => "grammar_rules",
            Table::Questions => "questions",
            Table::LessonVocabulary => "lesson_vocabulary",
            Table::LessonGrammar => "lesson_grammar",
            Table::ContentVersions => "content_versions",
            Table::UserProgress => "user_progress",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// == Content Backend ==
/// Remote row store holding all learning content.
///
/// Implementations report transport and database failures as
/// [`ContentError::RemoteUnavailable`](crate::error::ContentError::RemoteUnavailable)
/// and reject unusable queries with
/// [`ContentError::MalformedParameters`](crate::error::ContentError::MalformedParameters).
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Fetches the rows of `table` matching `query`.
    async fn select(&self, table: Table, query: &RowQuery) -> Result<Vec<Row>>;

    /// Appends a row and returns it as stored.
    async fn insert(&self, table: Table, row: Row) -> Result<Row>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_match_serde() {
        for table in [
            Table::Levels,
            Table::GrammarRules,
            Table::LessonVocabulary,
            Table::ContentVersions,
            Table::UserProgress,
        ] {
            let json = serde_json::to_value(table).unwrap();
            assert_eq!(json, table.name());
        }
    }
}
