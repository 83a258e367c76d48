//! Content Module
//!
//! Cache-aside reads, version ledger and incremental sync over the content backend.

mod ledger;
mod path;
mod reader;
mod service;
mod sync;

pub use ledger::{Version, VersionLedger, INITIAL_VERSION};
pub use path::{completion_percentage, LEARNING_PATH_SIZE};
pub use reader::{
    ContentReader, OP_LEARNING_PATH, OP_LESSON_WITH_CONTENT, OP_LEVELS_WITH_MODULES,
    OP_MODULE_WITH_LESSONS, OP_SEARCH_CONTENT,
};
pub use service::ContentService;
pub use sync::{parse_cursor, SyncCoordinator, EPOCH_CURSOR};
