//! Content rows as stored by the backend.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::backend::Row;
use crate::error::{ContentError, Result};

pub type ContentId = i64;

fn active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: ContentId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: ContentId,
    pub level_id: ContentId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: ContentId,
    pub module_id: ContentId,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub difficulty_level: Option<i32>,
    /// Declared duration in minutes
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: ContentId,
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub example_sentence: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<i32>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarRule {
    pub id: ContentId,
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub examples: Option<Value>,
    #[serde(default)]
    pub difficulty_level: Option<i32>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: ContentId,
    pub lesson_id: ContentId,
    pub question_text: String,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "active")]
    pub is_active: bool,
}

/// Link row between a lesson and a vocabulary item.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonVocabulary {
    pub lesson_id: ContentId,
    pub vocabulary_id: ContentId,
}

/// Link row between a lesson and a grammar rule.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonGrammar {
    pub lesson_id: ContentId,
    pub grammar_rule_id: ContentId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    pub lesson_id: ContentId,
    #[serde(default)]
    pub completed: bool,
}

/// One row of the append-only content version ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentVersion {
    #[serde(default)]
    pub id: Option<i64>,
    pub content_type: String,
    pub content_id: ContentId,
    pub version: String,
    #[serde(default)]
    pub change_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Decodes backend rows into a typed model.
pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).map_err(|err| {
                ContentError::RemoteUnavailable(format!("unexpected row shape in '{table}': {err}"))
            })
        })
        .collect()
}
