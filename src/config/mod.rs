pub mod init;
mod schema;

pub use schema::{Config, ThemeMode, DEFAULT_COUNTDOWN_TICK, DEFAULT_CURRENCY};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/leaderboard/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("leaderboard"))
}

/// Get the default config file path (~/.config/leaderboard/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/leaderboard/config.yaml)
///
/// A missing default file yields the default configuration. A missing file
/// that was asked for explicitly is an error.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "config loaded");
    Ok(config)
}

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match humantime::parse_duration(&config.countdown_tick) {
        Ok(d) if d.is_zero() => errors.push("countdown_tick: must be greater than zero".to_string()),
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "countdown_tick: invalid duration '{}' - {}",
            config.countdown_tick, e
        )),
    }

    if config.currency.trim().is_empty() {
        errors.push("currency: must not be empty".to_string());
    }

    if let Some(ref data) = config.data {
        if data.trim().is_empty() {
            errors.push("data: must not be empty".to_string());
        }
    }

    if let Err(points_errors) = crate::ranking::validate_points(&config.points) {
        errors.extend(points_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
