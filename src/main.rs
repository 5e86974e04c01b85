//! Shipit - push a curated set of files to a git remote
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use shipit::cli::args::SyncArgs;
use shipit::cli::{Cli, Commands};
use shipit::config::ConfigManager;
use shipit::error::ShipResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ShipResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn (status lines only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("shipit=warn"),
        1 => EnvFilter::new("shipit=info"),
        _ => EnvFilter::new("shipit=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Bare `shipit` runs a sync with default arguments
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Sync(SyncArgs::default()));

    // Init command doesn't need config loading
    if let Commands::Init(args) = command {
        return shipit::cli::commands::init(args).await;
    }

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| shipit::error::ShipError::io("getting current directory", e))?;
        let found = ConfigManager::find_local_config(&cwd);
        if let Some(ref path) = found {
            debug!("Found local config: {}", path.display());
        }
        found
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    // Dispatch to command
    match command {
        Commands::Init(_) => unreachable!("Init handled above"),
        Commands::Sync(args) => shipit::cli::commands::sync(args, &config).await,
        Commands::Status(args) => shipit::cli::commands::status(args, &config).await,
        Commands::Config(args) => shipit::cli::commands::config(args, &config).await,
    }
}
