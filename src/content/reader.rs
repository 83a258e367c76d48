//! Content Reader
//!
//! Cache-aside reads over the content backend: derive key, serve a hit, or
//! fetch from the backend, shape the result and populate the cache.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::backend::{ContentBackend, RowQuery, Table};
use crate::cache::{derive_key, SharedCache, DEFAULT_VERSION};
use crate::error::{ContentError, Result};
use crate::models::content::{decode_rows, LessonGrammar, LessonVocabulary};
use crate::models::{
    ContentFilters, ContentId, ContentKind, GrammarRule, Lesson, LessonWithContent, Level,
    LevelWithModules, Module, ModuleWithLessons, Question, SearchResults, VocabularyItem,
};

// == Operation Names ==
pub const OP_LEVELS_WITH_MODULES: &str = "levels_with_modules";
pub const OP_MODULE_WITH_LESSONS: &str = "module_with_lessons";
pub const OP_LESSON_WITH_CONTENT: &str = "lesson_with_content";
pub const OP_SEARCH_CONTENT: &str = "search_content";
pub const OP_LEARNING_PATH: &str = "learning_path";

// == Default Page Sizes ==
const LEVELS_PAGE_SIZE: usize = 50;
const LESSONS_PAGE_SIZE: usize = 100;
const SEARCH_PAGE_SIZE: usize = 20;

const LEVEL_SORT_FIELDS: &[&str] = &["order_index", "id", "name", "updated_at"];
const LESSON_SORT_FIELDS: &[&str] = &[
    "order_index",
    "id",
    "title",
    "difficulty_level",
    "estimated_duration",
    "updated_at",
];

// == Content Reader ==
#[derive(Clone)]
pub struct ContentReader {
    pub(crate) backend: Arc<dyn ContentBackend>,
    pub(crate) cache: SharedCache,
}

impl ContentReader {
    pub fn new(backend: Arc<dyn ContentBackend>, cache: SharedCache) -> Self {
        Self { backend, cache }
    }

    // == Cache-Aside ==
    /// Serves `operation` from the cache, or awaits `fetch` and caches its result.
    ///
    /// `fetch` is never polled on a hit. Failed fetches leave the cache untouched.
    pub(crate) async fn cached<T, P, Fut>(&self, operation: &str, params: &P, fetch: Fut) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        P: Serialize + ?Sized,
        Fut: Future<Output = Result<T>>,
    {
        let key = derive_key(operation, Some(params));

        let cached = self.cache.write().await.get(&key);
        if let Some(value) = cached {
            match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    debug!(%key, "cache hit");
                    return Ok(hit);
                }
                Err(err) => warn!(%key, error = %err, "discarding undecodable cache entry"),
            }
        }

        debug!(%key, "cache miss");
        let fresh = fetch.await?;

        match serde_json::to_value(&fresh) {
            Ok(value) => self
                .cache
                .write()
                .await
                .put(key, value, Some(DEFAULT_VERSION), None),
            Err(err) => warn!(%key, error = %err, "result not cacheable"),
        }

        Ok(fresh)
    }

    /// Runs one select and decodes the rows.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, table: Table, query: RowQuery) -> Result<Vec<T>> {
        let rows = self.backend.select(table, &query).await?;
        decode_rows(table.name(), rows)
    }

    // == Levels With Modules ==
    /// Levels, each with its modules in course order.
    pub async fn get_levels_with_modules(&self, filters: &ContentFilters) -> Result<Vec<LevelWithModules>> {
        self.cached(OP_LEVELS_WITH_MODULES, filters, async {
            let query = paged(
                visible(RowQuery::new(), filters),
                filters,
                LEVEL_SORT_FIELDS,
                LEVELS_PAGE_SIZE,
            )?;
            let levels: Vec<Level> = self.fetch(Table::Levels, query).await?;
            if levels.is_empty() {
                return Ok(Vec::new());
            }

            let level_ids = levels.iter().map(|l| json!(l.id)).collect();
            let modules_query = visible(RowQuery::new().is_in("level_id", level_ids), filters)
                .order_by("order_index", true);
            let modules: Vec<Module> = self.fetch(Table::Modules, modules_query).await?;

            Ok(levels
                .into_iter()
                .map(|level| {
                    let modules = modules
                        .iter()
                        .filter(|m| m.level_id == level.id)
                        .cloned()
                        .collect();
                    LevelWithModules { level, modules }
                })
                .collect())
        })
        .await
    }

    // == Module With Lessons ==
    /// A module and its lessons, sorted and paginated per `filters`.
    pub async fn get_module_with_lessons(
        &self,
        module_id: ContentId,
        filters: &ContentFilters,
    ) -> Result<ModuleWithLessons> {
        let params = json!({ "module_id": module_id, "filters": filters });

        self.cached(OP_MODULE_WITH_LESSONS, &params, async {
            let module: Module = self
                .fetch(Table::Modules, RowQuery::new().eq("id", module_id).limit(1))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| ContentError::NotFound(format!("module {module_id}")))?;

            let query = paged(
                with_difficulty(visible(RowQuery::new().eq("module_id", module_id), filters), filters),
                filters,
                LESSON_SORT_FIELDS,
                LESSONS_PAGE_SIZE,
            )?;
            let lessons = self.fetch(Table::Lessons, query).await?;

            Ok(ModuleWithLessons { module, lessons })
        })
        .await
    }

    // == Lesson With Content ==
    /// A lesson and, when `include_related`, its vocabulary, grammar and questions.
    pub async fn get_lesson_with_content(
        &self,
        lesson_id: ContentId,
        include_related: bool,
    ) -> Result<LessonWithContent> {
        let params = json!({ "lesson_id": lesson_id, "include_related": include_related });

        self.cached(OP_LESSON_WITH_CONTENT, &params, async {
            let lesson: Lesson = self
                .fetch(Table::Lessons, RowQuery::new().eq("id", lesson_id).limit(1))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| ContentError::NotFound(format!("lesson {lesson_id}")))?;

            if !include_related {
                return Ok(LessonWithContent {
                    lesson,
                    vocabulary: None,
                    grammar: None,
                    questions: None,
                });
            }

            let (vocabulary, grammar, questions) = tokio::try_join!(
                self.lesson_vocabulary(lesson_id),
                self.lesson_grammar(lesson_id),
                self.fetch::<Question>(
                    Table::Questions,
                    RowQuery::new()
                        .eq("lesson_id", lesson_id)
                        .active()
                        .order_by("order_index", true),
                ),
            )?;

            Ok(LessonWithContent {
                lesson,
                vocabulary: Some(vocabulary),
                grammar: Some(grammar),
                questions: Some(questions),
            })
        })
        .await
    }

    async fn lesson_vocabulary(&self, lesson_id: ContentId) -> Result<Vec<VocabularyItem>> {
        let links: Vec<LessonVocabulary> = self
            .fetch(Table::LessonVocabulary, RowQuery::new().eq("lesson_id", lesson_id))
            .await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids = links.iter().map(|l| json!(l.vocabulary_id)).collect();
        self.fetch(
            Table::Vocabulary,
            RowQuery::new().is_in("id", ids).active().order_by("word", true),
        )
        .await
    }

    async fn lesson_grammar(&self, lesson_id: ContentId) -> Result<Vec<GrammarRule>> {
        let links: Vec<LessonGrammar> = self
            .fetch(Table::LessonGrammar, RowQuery::new().eq("lesson_id", lesson_id))
            .await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids = links.iter().map(|l| json!(l.grammar_rule_id)).collect();
        self.fetch(
            Table::GrammarRules,
            RowQuery::new().is_in("id", ids).active().order_by("title", true),
        )
        .await
    }

    // == Search ==
    /// Case-insensitive substring search across the requested content kinds.
    ///
    /// An empty `kinds` slice searches everything.
    pub async fn search_content(
        &self,
        term: &str,
        kinds: &[ContentKind],
        filters: &ContentFilters,
    ) -> Result<SearchResults> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ContentError::MalformedParameters(
                "search term must not be empty".to_string(),
            ));
        }

        let kinds = ContentKind::normalize(kinds);
        let params = json!({ "term": term, "types": kinds, "filters": filters });

        self.cached(OP_SEARCH_CONTENT, &params, async {
            let wants = |kind| kinds.contains(&kind);
            let search = |columns: &[&str], order: &str| {
                let query = with_difficulty(visible(RowQuery::new().ilike(columns, term), filters), filters)
                    .order_by(order, true)
                    .limit(filters.limit.unwrap_or(SEARCH_PAGE_SIZE));
                match filters.offset {
                    Some(offset) => query.offset(offset),
                    None => query,
                }
            };

            let (lessons, vocabulary, grammar) = tokio::try_join!(
                self.fetch_if::<Lesson>(wants(ContentKind::Lesson), Table::Lessons, search(&["title", "content"], "order_index")),
                self.fetch_if::<VocabularyItem>(wants(ContentKind::Vocabulary), Table::Vocabulary, search(&["word", "translation"], "word")),
                self.fetch_if::<GrammarRule>(wants(ContentKind::Grammar), Table::GrammarRules, search(&["title", "explanation"], "title")),
            )?;

            Ok(SearchResults {
                lessons,
                vocabulary,
                grammar,
            })
        })
        .await
    }

    async fn fetch_if<T: DeserializeOwned>(&self, wanted: bool, table: Table, query: RowQuery) -> Result<Vec<T>> {
        if !wanted {
            return Ok(Vec::new());
        }
        self.fetch(table, query).await
    }
}

// == Query Helpers ==
/// Hides inactive rows unless the caller asked for them.
fn visible(query: RowQuery, filters: &ContentFilters) -> RowQuery {
    if filters.include_inactive {
        query
    } else {
        query.active()
    }
}

fn with_difficulty(query: RowQuery, filters: &ContentFilters) -> RowQuery {
    match filters.difficulty_level {
        Some(level) => query.eq("difficulty_level", Value::from(level)),
        None => query,
    }
}

/// Applies the caller's sort and pagination, falling back to `default_limit`.
fn paged(
    query: RowQuery,
    filters: &ContentFilters,
    sort_fields: &[&'static str],
    default_limit: usize,
) -> Result<RowQuery> {
    let column = filters.sort_column(sort_fields)?;
    let query = query
        .order_by(column, filters.sort_order.is_ascending())
        .limit(filters.limit.unwrap_or(default_limit));

    Ok(match filters.offset {
        Some(offset) => query.offset(offset),
        None => query,
    })
}
