//! Result shapes returned by the content service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{GrammarRule, Lesson, Level, Module, Question, VocabularyItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelWithModules {
    #[serde(flatten)]
    pub level: Level,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<Lesson>,
}

/// A lesson plus, when requested, its linked vocabulary, grammar and questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonWithContent {
    #[serde(flatten)]
    pub lesson: Lesson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vec<VocabularyItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<Vec<GrammarRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub lessons: Vec<Lesson>,
    pub vocabulary: Vec<VocabularyItem>,
    pub grammar: Vec<GrammarRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub user_id: String,
    pub target_level: i32,
    /// Next lessons at the target level, in course order
    pub recommended_lessons: Vec<Lesson>,
    pub completed_count: usize,
    pub total_count: usize,
    pub completion_percentage: u32,
    pub estimated_total_minutes: u32,
}

/// Rows changed since the caller's cursor, plus the cursor to use next time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub levels: Vec<Level>,
    pub modules: Vec<Module>,
    pub lessons: Vec<Lesson>,
    pub vocabulary: Vec<VocabularyItem>,
    pub grammar: Vec<GrammarRule>,
    pub synced_at: DateTime<Utc>,
}

impl SyncPayload {
    pub fn total_rows(&self) -> usize {
        self.levels.len()
            + self.modules.len()
            + self.lessons.len()
            + self.vocabulary.len()
            + self.grammar.len()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    pub removed: usize,
}

impl ClearCacheResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} cached entries", removed),
            removed,
        }
    }
}
