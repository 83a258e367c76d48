//! Content Cache - cache-aside content layer for a language-learning backend
//!
//! Time-boxed, size-bounded caching of content reads, an append-only content
//! version ledger and incremental sync against a remote content database.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use content::ContentService;
pub use error::{ContentError, ContentResult};
pub use tasks::spawn_cleanup_task;
