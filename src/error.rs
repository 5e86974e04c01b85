//! Error types for Shipit
//!
//! All modules use `ShipResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Shipit operations
pub type ShipResult<T> = Result<T, ShipError>;

/// All errors that can occur in Shipit
#[derive(Error, Debug)]
pub enum ShipError {
    // Environment errors
    #[error("git not found on PATH")]
    GitNotFound,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No remote URL configured")]
    RemoteUrlMissing,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with an error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    #[error("Push failed: {stderr}")]
    PushFailed { stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl ShipError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::GitNotFound => Some("Install git: https://git-scm.com/downloads"),
            Self::RemoteUrlMissing => {
                Some("Run: shipit init, then set remote.url in .shipit.toml")
            }
            Self::PushFailed { .. } => Some(
                "Check authentication, that the remote repository exists, and your connection",
            ),
            _ => None,
        }
    }
}
