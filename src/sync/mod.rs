//! File-sync core
//!
//! `cache` keeps the content hash of the tracked binary asset so an
//! unchanged blob is never re-staged; `engine` runs the sequential
//! git orchestration.

pub mod cache;
pub mod engine;

pub use cache::{has_changed, hash_file, HashCache};
pub use engine::{SyncEngine, SyncReport};
