//! # Configuration Loader
//!
//! - Reads the TOML configuration file into the [`AppConfig`] DTO
//! - Reports I/O and parsing errors with context
//!
//! No validation: whatever is in the file is accepted as a fact.

use anyhow::Context;
use gallery_core::config::AppConfig;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "PHOTO_GALLERY_CONFIG";

const APP_DIR_NAME: &str = "photo-gallery";

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// `$PHOTO_GALLERY_CONFIG`, else `<config_dir>/photo-gallery/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml")),
    }
}

/// Load `path` if it exists, otherwise fall back to system defaults rooted
/// in the platform data directory.
pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(path) = path.filter(|p| p.exists()) {
        return load_config(path.to_path_buf());
    }

    let data_dir = dirs::data_dir()
        .context("Failed to determine the platform data directory")?
        .join(APP_DIR_NAME);
    Ok(AppConfig::with_system_defaults(data_dir))
}
