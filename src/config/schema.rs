//! Configuration schema for Shipit
//!
//! Configuration is stored at `~/.config/shipit/config.toml`, with an
//! optional project-local `.shipit.toml` overlay.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote settings
    pub remote: RemoteConfig,

    /// Commit settings
    pub commit: CommitConfig,

    /// File selection settings
    pub files: FilesConfig,
}

/// Remote repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Remote alias to create or repoint
    pub name: String,

    /// Remote URL. Required for sync; there is no sensible default.
    pub url: Option<String>,

    /// Branch name to push when HEAD is detached or unborn
    pub fallback_branch: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            name: "origin".to_string(),
            url: None,
            fallback_branch: "master".to_string(),
        }
    }
}

/// Commit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Message used for every commit the tool creates
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            message: "Initial commit".to_string(),
        }
    }
}

/// File selection configuration
///
/// `tracked` is the allow-list: only these paths are ever staged, no
/// matter what else exists in the project directory. One entry may be
/// named in `hashed` to gate its staging on a content-hash cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Paths the tool is permitted to stage, in staging order
    pub tracked: Vec<String>,

    /// Allow-list entry whose staging is gated by the hash cache
    pub hashed: Option<String>,

    /// Cache file holding the hash of `hashed` as of the last stage
    pub cache_file: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            tracked: vec!["README.md".to_string()],
            hashed: None,
            cache_file: ".shipit-cache".to_string(),
        }
    }
}
