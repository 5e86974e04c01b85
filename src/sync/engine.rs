//! Sync engine - bring the allow-listed files onto the remote
//!
//! Runs the sequential flow: ensure repository, ensure remote, stage
//! the allow-list (asset gated by the hash cache), commit when the
//! index has changes, push with upstream tracking. Every git failure
//! on a mutating step propagates as a fatal error; queries are booleans.

use crate::config::Config;
use crate::error::{ShipError, ShipResult};
use crate::git::Repository;
use crate::sync::cache::{has_changed, hash_file, HashCache};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::debug;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
static FLOPPY: Emoji<'_, '_> = Emoji("💾 ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "");
static UPLOAD: Emoji<'_, '_> = Emoji("⬆️  ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[FAIL] ");

/// What one sync run actually did
#[derive(Debug, Default)]
pub struct SyncReport {
    /// A repository was created this run
    pub initialized: bool,
    /// Files handed to `git add`, in order
    pub staged: Vec<String>,
    /// The hash-tracked asset matched the cache and was not re-staged
    pub asset_skipped: bool,
    /// A commit was created
    pub committed: bool,
    /// The branch was pushed
    pub pushed: bool,
    /// Branch the push targeted, once determined
    pub branch: Option<String>,
}

/// Drives one sync run against a repository
pub struct SyncEngine {
    repo: Repository,
    config: Config,
}

impl SyncEngine {
    /// Engine over the real git binary in `project_dir`
    pub fn new(project_dir: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            repo: Repository::new(project_dir),
            config,
        }
    }

    /// Engine over a pre-built repository adapter
    pub fn with_repository(repo: Repository, config: Config) -> Self {
        Self { repo, config }
    }

    /// Run the full sync flow and report what happened
    pub async fn run(&self) -> ShipResult<SyncReport> {
        // Reject unusable configuration before the first git call
        if self.config.remote.url.is_none() {
            return Err(ShipError::RemoteUrlMissing);
        }

        let mut report = SyncReport::default();

        println!("{}Starting sync...", ROCKET);

        self.ensure_repository(&mut report).await?;
        self.ensure_remote().await?;
        self.select_and_stage(&mut report).await?;

        if report.staged.is_empty() {
            println!("{}No files to add", INFO);
        }

        if self.repo.has_staged_changes().await? {
            println!("{}Committing files...", FLOPPY);
            self.repo.commit(&self.config.commit.message).await?;
            report.committed = true;
        } else {
            println!("{}No changes to commit", INFO);
            // An empty history cannot be ahead of the remote tip
            if !self.repo.has_commits().await? || !self.repo.is_ahead_of_upstream().await? {
                println!("{}Nothing to push, remote is up to date", CHECK);
                return Ok(report);
            }
        }

        self.push(&mut report).await?;
        Ok(report)
    }

    async fn ensure_repository(&self, report: &mut SyncReport) -> ShipResult<()> {
        if self.repo.is_initialized().await? {
            println!("{}Git repository already initialized", CHECK);
        } else {
            println!("{}Initializing git repository...", FOLDER);
            self.repo.init().await?;
            report.initialized = true;
        }
        Ok(())
    }

    async fn ensure_remote(&self) -> ShipResult<()> {
        let url = self
            .config
            .remote
            .url
            .as_deref()
            .ok_or(ShipError::RemoteUrlMissing)?;
        let name = &self.config.remote.name;

        if self.repo.has_remote(name).await? {
            println!("{}Remote {} already exists", CHECK, name);
            // Repoint in case the configured URL drifted
            self.repo.set_remote_url(name, url).await?;
        } else {
            println!("{}Adding remote {}...", LINK, name);
            self.repo.add_remote(name, url).await?;
        }
        Ok(())
    }

    async fn select_and_stage(&self, report: &mut SyncReport) -> ShipResult<()> {
        for file in &self.config.files.tracked {
            let path = self.repo.workdir().join(file);

            if self.config.files.hashed.as_deref() == Some(file.as_str()) {
                self.stage_hashed_asset(file, &path, report).await?;
            } else if path.is_file() {
                println!("{}Adding {}...", PACKAGE, file);
                self.repo.stage(file).await?;
                report.staged.push(file.clone());
            } else {
                debug!("{} not present, skipping", file);
            }
        }
        Ok(())
    }

    /// Stage the hash-tracked asset only when its content moved past the
    /// cached hash, and record the fresh hash after a successful stage
    async fn stage_hashed_asset(
        &self,
        file: &str,
        path: &Path,
        report: &mut SyncReport,
    ) -> ShipResult<()> {
        if !path.is_file() {
            debug!("{} not present, skipping", file);
            return Ok(());
        }

        let cache = HashCache::new(self.repo.workdir().join(&self.config.files.cache_file));

        if !has_changed(path, &cache).await? {
            println!("{}{} unchanged, skipping", CHECK, file);
            report.asset_skipped = true;
            return Ok(());
        }

        println!("{}Adding {}...", PACKAGE, file);
        self.repo.stage(file).await?;
        report.staged.push(file.to_string());

        if let Some(hash) = hash_file(path).await? {
            cache.write(&hash).await?;
        }
        Ok(())
    }

    async fn push(&self, report: &mut SyncReport) -> ShipResult<()> {
        let name = &self.config.remote.name;
        let branch = match self.repo.current_branch().await? {
            Some(branch) => branch,
            None => {
                debug!(
                    "No current branch, falling back to {}",
                    self.config.remote.fallback_branch
                );
                self.config.remote.fallback_branch.clone()
            }
        };
        report.branch = Some(branch.clone());

        println!("{}Pushing {} to {}...", UPLOAD, branch, name);
        let pb = create_progress_bar("Waiting for the remote...");
        let result = self.repo.push_upstream(name, &branch).await;
        pb.finish_and_clear();

        if let Err(e) = result {
            println!("{}Failed to push. You might need to:", CROSS);
            println!("   1. Set up authentication (personal access token or SSH key)");
            println!("   2. Create the repository on the remote host first");
            println!("   3. Check your internet connection");
            return Err(e);
        }

        println!("{}Successfully pushed to {}", CHECK, name);
        report.pushed = true;
        Ok(())
    }
}

fn create_progress_bar(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
