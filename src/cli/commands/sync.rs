//! Sync command - run the stage/commit/push flow

use crate::cli::args::SyncArgs;
use crate::config::Config;
use crate::error::{ShipError, ShipResult};
use crate::sync::SyncEngine;
use std::path::PathBuf;
use tracing::debug;

/// Execute the sync command
pub async fn execute(args: SyncArgs, config: &Config) -> ShipResult<()> {
    let project_dir = resolve_project_dir(&args)?;
    debug!("Project directory: {}", project_dir.display());

    let mut config = config.clone();
    if let Some(message) = args.message {
        config.commit.message = message;
    }

    let engine = SyncEngine::new(project_dir, config);
    engine.run().await?;
    Ok(())
}

fn resolve_project_dir(args: &SyncArgs) -> ShipResult<PathBuf> {
    if let Some(ref path) = args.path {
        return path.canonicalize().map_err(|e| {
            ShipError::io(format!("resolving project path {}", path.display()), e)
        });
    }

    std::env::current_dir().map_err(|e| ShipError::io("getting current directory", e))
}
