//! Content models
//!
//! Typed backend rows, read filters and the result shapes handed to callers.

pub mod content;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use content::{
    ContentId, ContentVersion, GrammarRule, Lesson, Level, Module, Question, VocabularyItem,
};
pub use requests::{
    ContentFilters, ContentKind, LearningPathQuery, LessonQuery, RecordChangeRequest, SearchQuery,
    SortOrder, SyncRequest,
};
pub use responses::{
    ClearCacheResponse, HealthResponse, LearningPath, LessonWithContent, LevelWithModules,
    ModuleWithLessons, SearchResults, SyncPayload,
};
