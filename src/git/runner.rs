//! Git command execution
//!
//! Wraps the git binary behind a trait. Non-zero exits are data at this
//! layer; callers decide whether a failure is a boolean answer (queries)
//! or fatal (mutations).

use crate::error::{ShipError, ShipResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one git invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Trimmed standard output
    pub stdout: String,
    /// Trimmed standard error
    pub stderr: String,
}

impl CommandOutput {
    /// True when the command exited zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes git commands in a working directory
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `git <args>` in `cwd` and capture its output.
    ///
    /// Only spawn failures (e.g. no git binary) are errors.
    async fn run(&self, args: &[&str], cwd: &Path) -> ShipResult<CommandOutput>;
}

/// Runs the real git binary
pub struct GitRunner;

#[async_trait]
impl CommandRunner for GitRunner {
    async fn run(&self, args: &[&str], cwd: &Path) -> ShipResult<CommandOutput> {
        debug!("Executing: git {:?} in {}", args, cwd.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ShipError::GitNotFound
                } else {
                    ShipError::command_failed(format!("git {}", args.join(" ")), e)
                }
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
