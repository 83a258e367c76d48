//! API Module
//!
//! HTTP handlers and routing for the content service.
//!
//! # Endpoints
//! - `GET /levels` - Levels with their modules
//! - `GET /modules/:id` - Module with its lessons
//! - `GET /lessons/:id` - Lesson with vocabulary, grammar and questions
//! - `GET /search` - Search lessons, vocabulary and grammar
//! - `GET /users/:user_id/learning-path` - Personalized learning path
//! - `POST /sync` - Incremental sync from a cursor
//! - `GET|POST /versions/:content_type/:content_id` - Read or bump a content version
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
