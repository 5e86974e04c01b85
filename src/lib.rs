//! Shipit - push a curated set of local files to a git remote
//!
//! Initializes the repository when needed, keeps the remote pointed at
//! the configured URL, stages an allow-list of files (skipping an
//! unchanged binary asset via a content-hash cache), commits, and
//! pushes with upstream tracking.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod sync;

pub use error::{ShipError, ShipResult};
