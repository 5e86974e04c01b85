//! Configuration management for Shipit

pub mod schema;

pub use schema::Config;

use crate::error::{ShipError, ShipResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Name of the project-local configuration file
pub const LOCAL_CONFIG_NAME: &str = ".shipit.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shipit")
            .join("config.toml")
    }

    /// Walk up from `start` looking for a `.shipit.toml`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load the global configuration, using defaults if the file is absent
    pub async fn load(&self) -> ShipResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        let value = self.load_value(&self.config_path).await?;
        value.try_into().map_err(|e: toml::de::Error| {
            ShipError::ConfigInvalid {
                path: self.config_path.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Load the global configuration with an optional project-local
    /// overlay merged over it. Local keys win at table-value depth.
    pub async fn load_merged(&self, local: Option<&Path>) -> ShipResult<Config> {
        let mut merged = if self.config_path.exists() {
            self.load_value(&self.config_path).await?
        } else {
            debug!("Global config not found, starting from defaults");
            toml::Value::Table(toml::map::Map::new())
        };

        if let Some(local_path) = local {
            let overlay = self.load_value(local_path).await?;
            merge_values(&mut merged, overlay);
            debug!("Merged local config from {}", local_path.display());
        }

        merged.try_into().map_err(|e: toml::de::Error| {
            ShipError::ConfigInvalid {
                path: local.unwrap_or(&self.config_path).to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    async fn load_value(&self, path: &Path) -> ShipResult<toml::Value> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ShipError::io(format!("reading config from {}", path.display()), e))?;

        content
            .parse()
            .map_err(|e: toml::de::Error| ShipError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> ShipResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            ShipError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> ShipResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ShipError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively merge `overlay` into `base`; overlay wins on leaf conflicts
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => {
                        base_table.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
