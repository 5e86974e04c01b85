//! Init command - create project-local .shipit.toml

use crate::cli::args::InitArgs;
use crate::config::LOCAL_CONFIG_NAME;
use crate::error::{ShipError, ShipResult};
use console::{style, Emoji};
use std::path::Path;
use tokio::fs;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");

/// Template for project-local config
const INIT_TEMPLATE: &str = r#"# Shipit project configuration
# Settings here override your global config (~/.config/shipit/config.toml)

[remote]
# url = "https://github.com/you/repo.git"
# name = "origin"
# fallback_branch = "master"

[commit]
# message = "Initial commit"

[files]
# Only the paths listed here are ever staged.
# tracked = ["README.md", "incoming.mp3"]
# Name one entry to skip re-staging it while its content hash is unchanged.
# hashed = "incoming.mp3"
# cache_file = ".shipit-cache"
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> ShipResult<()> {
    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => {
            std::env::current_dir().map_err(|e| ShipError::io("getting current directory", e))?
        }
    };

    let config_path = target_dir.join(LOCAL_CONFIG_NAME);

    if config_path.exists() && !args.force {
        return Err(ShipError::User(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    ensure_dir(&target_dir).await?;

    fs::write(&config_path, INIT_TEMPLATE)
        .await
        .map_err(|e| ShipError::io(format!("writing {}", config_path.display()), e))?;

    println!(
        "{}Created project config {}",
        CHECK,
        style(config_path.display()).cyan()
    );

    Ok(())
}

async fn ensure_dir(dir: &Path) -> ShipResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ShipError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}
