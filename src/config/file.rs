// src/config/file.rs
// File-based configuration from ~/.emno/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config file structure
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub retry: RetrySection,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClientSection {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub should_throw: Option<bool>,
    pub log_errors: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RetrySection {
    pub max_retries: Option<u32>,
    pub base_delay_ms: Option<u64>,
}

impl FileConfig {
    /// Load config from ~/.emno/config.toml, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".emno")
            .join("config.toml")
    }
}
