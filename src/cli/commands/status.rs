//! Status command - check git, repository, and cache state

use crate::cli::args::{OutputFormat, StatusArgs};
use crate::config::Config;
use crate::error::{ShipError, ShipResult};
use crate::git::{CommandRunner, GitRunner, Repository};
use chrono::{DateTime, Utc};
use console::{style, Emoji};
use serde::Serialize;
use std::path::Path;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Serializable summary of one status run
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// `git --version` output, `None` when the binary is unavailable
    pub git_version: Option<String>,
    /// The project directory holds a git repository
    pub repository_initialized: bool,
    /// Remote alias the tool manages
    pub remote_name: String,
    /// URL from configuration
    pub configured_url: Option<String>,
    /// URL the remote actually points at
    pub actual_url: Option<String>,
    /// Actual URL matches the configured one
    pub remote_in_sync: bool,
    /// Per-file presence of the allow-list
    pub files: Vec<FileStatus>,
    /// Hash cache state, when an asset is configured
    pub cache: Option<CacheStatus>,
}

/// Presence of one allow-listed file
#[derive(Debug, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub present: bool,
    pub hashed: bool,
}

/// State of the asset hash cache
#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub path: String,
    pub present: bool,
    /// Hours since the cache file was last written
    pub age_hours: Option<i64>,
}

/// Execute the status command
pub async fn execute(args: StatusArgs, config: &Config) -> ShipResult<()> {
    let project_dir = match args.path {
        Some(ref p) => p.clone(),
        None => {
            std::env::current_dir().map_err(|e| ShipError::io("getting current directory", e))?
        }
    };

    let report = gather(&project_dir, config).await?;

    match args.format {
        OutputFormat::Table => print_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => print_plain(&report),
    }

    Ok(())
}

async fn gather(project_dir: &Path, config: &Config) -> ShipResult<StatusReport> {
    let git_version = probe_git(project_dir).await;

    let (repository_initialized, actual_url) = if git_version.is_some() {
        let repo = Repository::new(project_dir);
        let initialized = repo.is_initialized().await?;
        let url = if initialized {
            repo.remote_url(&config.remote.name).await?
        } else {
            None
        };
        (initialized, url)
    } else {
        (false, None)
    };

    let remote_in_sync =
        actual_url.is_some() && actual_url.as_deref() == config.remote.url.as_deref();

    let files = config
        .files
        .tracked
        .iter()
        .map(|path| FileStatus {
            present: project_dir.join(path).is_file(),
            hashed: config.files.hashed.as_deref() == Some(path.as_str()),
            path: path.clone(),
        })
        .collect();

    let cache = config.files.hashed.as_ref().map(|_| {
        let path = project_dir.join(&config.files.cache_file);
        CacheStatus {
            present: path.is_file(),
            age_hours: cache_age_hours(&path),
            path: config.files.cache_file.clone(),
        }
    });

    Ok(StatusReport {
        git_version,
        repository_initialized,
        remote_name: config.remote.name.clone(),
        configured_url: config.remote.url.clone(),
        actual_url,
        remote_in_sync,
        files,
        cache,
    })
}

async fn probe_git(project_dir: &Path) -> Option<String> {
    match GitRunner.run(&["--version"], project_dir).await {
        Ok(out) if out.success() => Some(out.stdout),
        _ => None,
    }
}

fn cache_age_hours(path: &Path) -> Option<i64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let modified: DateTime<Utc> = modified.into();
    Some((Utc::now() - modified).num_hours())
}

fn print_table(report: &StatusReport) {
    println!("{}", style("Shipit Status").bold().cyan());

    println!();
    println!("{}", style("Git:").bold());
    match &report.git_version {
        Some(version) => println!("  {} {}", CHECK, style(version).green()),
        None => println!(
            "  {} {} - Install git: https://git-scm.com/downloads",
            CROSS,
            style("Not found").red()
        ),
    }

    println!();
    println!("{}", style("Repository:").bold());
    if report.repository_initialized {
        println!("  {} {}", CHECK, style("Initialized").green());
    } else {
        println!(
            "  {} {} - Run: shipit sync",
            WARN,
            style("Not initialized").yellow()
        );
    }

    match (&report.configured_url, &report.actual_url) {
        (Some(configured), Some(_)) if report.remote_in_sync => {
            println!("  {} Remote {}: {}", CHECK, report.remote_name, configured);
        }
        (Some(configured), Some(actual)) => {
            println!(
                "  {} Remote {} points at {} (configured: {}) - sync will repoint it",
                WARN, report.remote_name, actual, configured
            );
        }
        (Some(configured), None) => {
            println!(
                "  {} Remote {} not set up yet (configured: {})",
                WARN, report.remote_name, configured
            );
        }
        (None, _) => {
            println!(
                "  {} {} - Run: shipit init",
                CROSS,
                style("No remote URL configured").red()
            );
        }
    }

    println!();
    println!("{}", style("Files:").bold());
    for file in &report.files {
        let marker = if file.present { CHECK } else { WARN };
        let note = match (file.present, file.hashed) {
            (true, true) => " (hash-tracked)",
            (false, _) => " - not present, will be skipped",
            _ => "",
        };
        println!("  {} {}{}", marker, file.path, note);
    }

    if let Some(cache) = &report.cache {
        println!();
        println!("{}", style("Asset cache:").bold());
        if cache.present {
            match cache.age_hours {
                Some(age) => println!("  {} {} (written {}h ago)", CHECK, cache.path, age),
                None => println!("  {} {}", CHECK, cache.path),
            }
        } else {
            println!(
                "  {} {} - no cache yet, asset will be staged",
                WARN, cache.path
            );
        }
    }
}

fn print_plain(report: &StatusReport) {
    println!(
        "git: {}",
        report.git_version.as_deref().unwrap_or("not found")
    );
    println!("repository: {}", report.repository_initialized);
    println!(
        "remote {}: configured={} actual={} in_sync={}",
        report.remote_name,
        report.configured_url.as_deref().unwrap_or("-"),
        report.actual_url.as_deref().unwrap_or("-"),
        report.remote_in_sync
    );
    for file in &report.files {
        println!("file {}: present={}", file.path, file.present);
    }
    if let Some(cache) = &report.cache {
        println!("cache {}: present={}", cache.path, cache.present);
    }
}
