//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LOCAL_CONFIG_NAME};
use crate::error::{ShipError, ShipResult};
use console::{style, Emoji};
use tokio::fs;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config) -> ShipResult<()> {
    let manager = ConfigManager::new();

    match args.action {
        None | Some(ConfigAction::Show) => show_config(config),
        Some(ConfigAction::Path) => show_path(&manager),
        Some(ConfigAction::Init { force }) => init_config(&manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            if local {
                set_local_value(&key, &value).await?
            } else {
                set_value(&manager, config, &key, &value).await?
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config) {
    let toml =
        toml::to_string_pretty(config).unwrap_or_else(|_| "Error serializing config".to_string());
    println!("{}", toml);
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> ShipResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{}Config already exists at {} - use --force to overwrite",
            WARN,
            path.display()
        );
        return Ok(());
    }

    let config = Config::default();
    manager.save(&config).await?;

    println!(
        "{}Configuration initialized at {}",
        CHECK,
        style(path.display()).cyan()
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> ShipResult<()> {
    let mut config = config.clone();

    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["remote", "name"] => config.remote.name = value.to_string(),
        ["remote", "url"] => config.remote.url = Some(value.to_string()),
        ["remote", "fallback_branch"] => config.remote.fallback_branch = value.to_string(),

        ["commit", "message"] => config.commit.message = value.to_string(),

        ["files", "tracked"] => {
            config.files.tracked = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        ["files", "hashed"] => config.files.hashed = Some(value.to_string()),
        ["files", "cache_file"] => config.files.cache_file = value.to_string(),

        _ => {
            println!("{}Unknown config key: {}", CROSS, key);
            eprintln!("Valid keys:");
            print_valid_keys();
            return Ok(());
        }
    }

    manager.save(&config).await?;
    println!("{}Set {} = {}", CHECK, key, value);

    Ok(())
}

async fn set_local_value(key: &str, value: &str) -> ShipResult<()> {
    let cwd = std::env::current_dir().map_err(|e| ShipError::io("getting current directory", e))?;
    let local_path = cwd.join(LOCAL_CONFIG_NAME);

    // Validate the key before touching the file
    validate_config_key(key)?;

    // Load existing local config or start with an empty TOML table
    let mut doc: toml::Value = if local_path.exists() {
        let content = fs::read_to_string(&local_path)
            .await
            .map_err(|e| ShipError::io(format!("reading {}", local_path.display()), e))?;
        content
            .parse()
            .map_err(|e: toml::de::Error| ShipError::ConfigInvalid {
                path: local_path.clone(),
                reason: e.to_string(),
            })?
    } else {
        toml::Value::Table(toml::map::Map::new())
    };

    // Set the key in the TOML tree
    set_toml_value(&mut doc, key, value)?;

    // Write back only the keys the user has explicitly set
    let content = toml::to_string_pretty(&doc)?;
    fs::write(&local_path, content)
        .await
        .map_err(|e| ShipError::io(format!("writing {}", local_path.display()), e))?;

    println!(
        "{}Set {} = {} in {}",
        CHECK,
        key,
        value,
        local_path.display()
    );

    Ok(())
}

/// Validate that a config key is one we recognise.
fn validate_config_key(key: &str) -> ShipResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["remote", "name" | "url" | "fallback_branch"]
        | ["commit", "message"]
        | ["files", "tracked" | "hashed" | "cache_file"] => Ok(()),
        _ => Err(ShipError::User(format!("Unknown config key: {}", key))),
    }
}

/// Set a dot-separated key in a TOML value tree, creating intermediate tables as needed.
fn set_toml_value(doc: &mut toml::Value, key: &str, value: &str) -> ShipResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = doc;

    // Navigate/create intermediate tables
    for &part in &parts[..parts.len() - 1] {
        current = current
            .as_table_mut()
            .ok_or_else(|| ShipError::User(format!("Expected table at key: {}", part)))?
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let leaf = parts.last().unwrap();
    let table = current
        .as_table_mut()
        .ok_or_else(|| ShipError::User(format!("Expected table for key: {}", key)))?;

    // Keys that store as arrays
    let is_list_key = key.ends_with("tracked");

    let toml_value = if is_list_key {
        let items: Vec<toml::Value> = value
            .split(',')
            .map(|s| toml::Value::String(s.trim().to_string()))
            .filter(|v| v.as_str().map(|s| !s.is_empty()).unwrap_or(false))
            .collect();
        toml::Value::Array(items)
    } else if value == "true" || value == "false" {
        toml::Value::Boolean(value.parse().unwrap())
    } else if let Ok(n) = value.parse::<i64>() {
        toml::Value::Integer(n)
    } else {
        toml::Value::String(value.to_string())
    };

    table.insert((*leaf).to_string(), toml_value);
    Ok(())
}

fn print_valid_keys() {
    let keys = [
        "remote.name",
        "remote.url",
        "remote.fallback_branch",
        "commit.message",
        "files.tracked",
        "files.hashed",
        "files.cache_file",
    ];

    for key in keys {
        eprintln!("  {}", key);
    }
}
