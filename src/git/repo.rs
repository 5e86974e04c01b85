//! Repository state adapter
//!
//! The only place that interprets git's textual output. Queries return
//! booleans; mutating operations map non-zero exits to errors carrying
//! the command and captured stderr.

use crate::error::{ShipError, ShipResult};
use crate::git::runner::{CommandOutput, CommandRunner, GitRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Git repository rooted at a working directory
pub struct Repository {
    runner: Arc<dyn CommandRunner>,
    workdir: PathBuf,
}

impl Repository {
    /// Open a repository adapter over the real git binary
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner: Arc::new(GitRunner),
            workdir: workdir.into(),
        }
    }

    /// Open a repository adapter over a custom runner
    pub fn with_runner(workdir: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
        }
    }

    /// The directory every git command runs in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn git(&self, args: &[&str]) -> ShipResult<CommandOutput> {
        self.runner.run(args, &self.workdir).await
    }

    /// Run a mutating command; non-zero exit is fatal
    async fn git_ok(&self, args: &[&str]) -> ShipResult<CommandOutput> {
        let out = self.git(args).await?;
        if out.success() {
            Ok(out)
        } else {
            Err(ShipError::command_exec(
                format!("git {}", args.join(" ")),
                out.stderr,
            ))
        }
    }

    /// True when the working directory is inside a git repository
    pub async fn is_initialized(&self) -> ShipResult<bool> {
        let out = self.git(&["rev-parse", "--git-dir"]).await?;
        Ok(!out.stdout.is_empty() && !out.stderr.contains("not a git repository"))
    }

    /// Initialize a repository in the working directory
    pub async fn init(&self) -> ShipResult<()> {
        self.git_ok(&["init"]).await?;
        Ok(())
    }

    /// True when the named remote exists and resolves to a URL
    pub async fn has_remote(&self, name: &str) -> ShipResult<bool> {
        let out = self.git(&["remote", "get-url", name]).await?;
        Ok(!out.stderr.to_lowercase().contains("error") && !out.stdout.is_empty())
    }

    /// URL of the named remote, if it exists
    pub async fn remote_url(&self, name: &str) -> ShipResult<Option<String>> {
        let out = self.git(&["remote", "get-url", name]).await?;
        if out.success() && !out.stdout.is_empty() {
            Ok(Some(out.stdout))
        } else {
            Ok(None)
        }
    }

    pub async fn add_remote(&self, name: &str, url: &str) -> ShipResult<()> {
        self.git_ok(&["remote", "add", name, url]).await?;
        Ok(())
    }

    pub async fn set_remote_url(&self, name: &str, url: &str) -> ShipResult<()> {
        self.git_ok(&["remote", "set-url", name, url]).await?;
        Ok(())
    }

    /// Stage one path
    pub async fn stage(&self, path: &str) -> ShipResult<()> {
        self.git_ok(&["add", "--", path]).await?;
        Ok(())
    }

    /// True when the index differs from HEAD (or from the empty tree on
    /// an unborn branch)
    pub async fn has_staged_changes(&self) -> ShipResult<bool> {
        let out = self.git(&["diff", "--cached", "--quiet"]).await?;
        match out.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ShipError::command_exec(
                "git diff --cached --quiet",
                out.stderr,
            )),
        }
    }

    /// True when the repository has at least one commit
    pub async fn has_commits(&self) -> ShipResult<bool> {
        let out = self.git(&["rev-parse", "--verify", "HEAD"]).await?;
        Ok(out.success())
    }

    /// True when local history has commits the upstream lacks.
    ///
    /// A failed query (no upstream configured yet) counts as ahead, so
    /// the first push of a branch is still attempted.
    pub async fn is_ahead_of_upstream(&self) -> ShipResult<bool> {
        let out = self.git(&["log", "@{u}..HEAD", "--oneline"]).await?;
        if !out.success() {
            debug!("Upstream query failed, assuming unpushed commits: {}", out.stderr);
            return Ok(true);
        }
        Ok(!out.stdout.is_empty())
    }

    /// Name of the checked-out branch, `None` when detached
    pub async fn current_branch(&self) -> ShipResult<Option<String>> {
        let out = self.git(&["branch", "--show-current"]).await?;
        if out.success() && !out.stdout.is_empty() {
            Ok(Some(out.stdout))
        } else {
            Ok(None)
        }
    }

    /// Commit staged content
    pub async fn commit(&self, message: &str) -> ShipResult<()> {
        self.git_ok(&["commit", "-m", message]).await?;
        Ok(())
    }

    /// Push the branch and set its upstream tracking link
    pub async fn push_upstream(&self, remote: &str, branch: &str) -> ShipResult<()> {
        let out = self.git(&["push", "-u", remote, branch]).await?;
        if out.success() {
            Ok(())
        } else {
            Err(ShipError::PushFailed { stderr: out.stderr })
        }
    }
}
