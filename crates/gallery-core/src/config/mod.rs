//! # Pure Data Module - Data Transfer Objects Only
//!
//! Maps the TOML configuration file onto [`AppConfig`]. No validation and
//! no policy live here: missing keys become empty values, and whether an
//! empty value is acceptable is decided by the wiring layer.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root directory of the filesystem object store (may be empty).
    pub storage_root: PathBuf,

    /// Base of durable object URLs, e.g. `https://cdn.example.com`.
    pub public_base_url: String,

    /// Whether logs are also written to the platform log directory.
    pub file_logging: bool,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: no validation or default value logic. Empty strings
    /// are valid facts.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            storage_root: PathBuf::from(
                toml_value
                    .get("storage")
                    .and_then(|s| s.get("root_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            public_base_url: toml_value
                .get("storage")
                .and_then(|s| s.get("public_base_url"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            file_logging: toml_value
                .get("logging")
                .and_then(|l| l.get("file_logging"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            storage_root: PathBuf::new(),
            public_base_url: String::new(),
            file_logging: false,
        }
    }

    /// Create AppConfig with system-default paths for production use
    ///
    /// `data_dir` is computed by the caller (e.g. with the `dirs` crate).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        let storage_root = data_dir.join("objects");
        Self {
            public_base_url: format!("file://{}", storage_root.display()),
            storage_root,
            file_logging: true,
        }
    }
}
