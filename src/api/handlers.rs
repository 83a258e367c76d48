//! API Handlers
//!
//! HTTP request handlers mapping each endpoint onto the content service.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};

use crate::cache::CacheStats;
use crate::content::ContentService;
use crate::error::{ContentError, ContentResult, Result};
use crate::models::{
    ClearCacheResponse, ContentFilters, ContentId, ContentVersion, HealthResponse, LearningPath,
    LearningPathQuery, LessonQuery, LessonWithContent, LevelWithModules, ModuleWithLessons,
    RecordChangeRequest, SearchQuery, SearchResults, SyncPayload, SyncRequest,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContentService>,
}

impl AppState {
    pub fn new(service: ContentService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Handler for GET /levels
pub async fn levels_handler(
    State(state): State<AppState>,
    Query(filters): Query<ContentFilters>,
) -> ContentResult<Vec<LevelWithModules>> {
    state.service.get_levels_with_modules(&filters).await
}

/// Handler for GET /modules/:id
pub async fn module_handler(
    State(state): State<AppState>,
    Path(module_id): Path<ContentId>,
    Query(filters): Query<ContentFilters>,
) -> ContentResult<ModuleWithLessons> {
    state.service.get_module_with_lessons(module_id, &filters).await
}

/// Handler for GET /lessons/:id
pub async fn lesson_handler(
    State(state): State<AppState>,
    Path(lesson_id): Path<ContentId>,
    Query(query): Query<LessonQuery>,
) -> ContentResult<LessonWithContent> {
    state
        .service
        .get_lesson_with_content(lesson_id, query.include_related)
        .await
}

/// Handler for GET /search
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ContentResult<SearchResults> {
    let kinds = match query.kinds() {
        Ok(kinds) => kinds,
        Err(err) => return ContentResult::failure(err),
    };

    state
        .service
        .search_content(&query.term, &kinds, &query.filters())
        .await
}

/// Handler for GET /users/:user_id/learning-path
pub async fn learning_path_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<LearningPathQuery>,
) -> ContentResult<LearningPath> {
    state
        .service
        .get_personalized_learning_path(&user_id, query.level)
        .await
}

/// Handler for POST /sync
///
/// An empty body syncs from the epoch. A body that is not a valid
/// `SyncRequest` is rejected rather than treated as empty.
pub async fn sync_handler(State(state): State<AppState>, body: Bytes) -> ContentResult<SyncPayload> {
    let request = match parse_sync_request(&body) {
        Ok(request) => request,
        Err(err) => return ContentResult::failure(err),
    };

    state
        .service
        .sync_content_updates(request.last_sync_timestamp.as_deref())
        .await
}

fn parse_sync_request(body: &[u8]) -> Result<SyncRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SyncRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| ContentError::MalformedParameters(format!("invalid sync request: {err}")))
}

/// Handler for GET /versions/:content_type/:content_id
pub async fn current_version_handler(
    State(state): State<AppState>,
    Path((content_type, content_id)): Path<(String, ContentId)>,
) -> ContentResult<String> {
    state.service.current_version(&content_type, content_id).await
}

/// Handler for POST /versions/:content_type/:content_id
///
/// Ledger failures are logged by the service and reported as an unsuccessful
/// result without an error status.
pub async fn record_change_handler(
    State(state): State<AppState>,
    Path((content_type, content_id)): Path<(String, ContentId)>,
    Json(req): Json<RecordChangeRequest>,
) -> Json<ContentResult<Option<ContentVersion>>> {
    let recorded = state
        .service
        .record_content_change(&content_type, content_id, &req.change_description)
        .await;

    let mut result = ContentResult::ok(recorded.clone());
    if recorded.is_none() {
        result.success = false;
        result.error = Some("content version not recorded".to_string());
    }
    Json(result)
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.service.get_cache_stats().await)
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    Json(ClearCacheResponse::new(state.service.clear_all_cache().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
