//! Configuration loading functionality.
//!
//! Handles locating the configuration file, creating it on first use, applying
//! defaults, and merging `geo.toml` overrides.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::validation::validate_config;
use super::{Config, GeoConfig};
use crate::constants::*;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
/// Returns an error if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
/// Returns None if using the default directory.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path of the configuration file, honoring a directory set with [`set_config_dir`].
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration using automatic path detection.
///
/// Creates a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        log_block_start!(
            "Creating default configuration at {}",
            display_path(&config_path)
        );
        super::builder::create_default_config(&config_path, None)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", display_path(&config_path)))
}

/// Load configuration from a specific path.
///
/// Unlike [`load`], a missing file is an error.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found at {}", display_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", display_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", display_path(path)))?;

    // geo.toml values are validated together with the main file
    load_geo_override_from_path(&mut config, path)?;

    validate_config(&config)?;

    apply_defaults(&mut config);

    Ok(config)
}

/// Apply default values to configuration fields.
fn apply_defaults(config: &mut Config) {
    if config.birth_date.is_none() {
        config.birth_date = Some(DEFAULT_BIRTH_DATE.to_string());
    }
    if config.birth_time.is_none() {
        config.birth_time = Some(DEFAULT_BIRTH_TIME.to_string());
    }
    if config.timezone.is_none() {
        config.timezone = Some(DEFAULT_TIMEZONE.to_string());
    }
    if config.latitude.is_none() {
        config.latitude = Some(DEFAULT_LATITUDE);
    }
    if config.longitude.is_none() {
        config.longitude = Some(DEFAULT_LONGITUDE);
    }
    if config.elevation.is_none() {
        config.elevation = Some(DEFAULT_ELEVATION);
    }
    if config.debug.is_none() {
        config.debug = Some(DEFAULT_DEBUG);
    }
}

/// Merge `geo.toml` from beside `config_path` into `config`.
///
/// A missing file is fine. An unreadable or malformed one is reported and skipped.
pub(crate) fn load_geo_override_from_path(config: &mut Config, config_path: &Path) -> Result<()> {
    let geo_path = match config_path.parent() {
        Some(parent) => parent.join("geo.toml"),
        None => return Ok(()),
    };

    if !geo_path.exists() {
        return Ok(());
    }

    match fs::read_to_string(&geo_path) {
        Ok(content) => match toml::from_str::<GeoConfig>(&content) {
            Ok(geo_config) => {
                if let Some(lat) = geo_config.latitude {
                    config.latitude = Some(lat);
                }
                if let Some(lon) = geo_config.longitude {
                    config.longitude = Some(lon);
                }
                if let Some(elevation) = geo_config.elevation {
                    config.elevation = Some(elevation);
                }
                log_debug!("Loaded coordinates from {}", display_path(&geo_path));
            }
            Err(e) => {
                log_warning!("Failed to parse geo.toml: {e}. Using coordinates from main config.");
            }
        },
        Err(e) => {
            log_warning!("Failed to read geo.toml: {e}. Using coordinates from main config.");
        }
    }

    Ok(())
}

/// Render `path` with the home directory shortened to `~`.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}
