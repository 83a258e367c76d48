//! API Routes
//!
//! Configures the Axum router with all content service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, current_version_handler, health_handler,
    learning_path_handler, lesson_handler, levels_handler, module_handler, record_change_handler,
    search_handler, sync_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, the mobile client talks to it directly
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/levels", get(levels_handler))
        .route("/modules/:id", get(module_handler))
        .route("/lessons/:id", get(lesson_handler))
        .route("/search", get(search_handler))
        .route("/users/:user_id/learning-path", get(learning_path_handler))
        .route("/sync", post(sync_handler))
        .route(
            "/versions/:content_type/:content_id",
            get(current_version_handler).post(record_change_handler),
        )
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
