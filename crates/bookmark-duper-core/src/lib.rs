pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod progress;
pub mod scanner;
pub mod storage;

pub use analysis::{DeletionOutcome, DeletionStatus, PendingDeletions};
pub use config::AppConfig;
pub use engine::{DedupeEngine, EngineState, ScanOutcome, ScanReport};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use storage::models::{BookmarkNode, DuplicateGroup, ItemKind, NodeId, ScannedItem};
pub use storage::{BookmarkStore, ChromiumBookmarks};
