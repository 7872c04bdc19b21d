//! Configuration management for battlepassd.
//!
//! Loads settings from /etc/battlepassd/config.toml or uses defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default config file path.
pub const CONFIG_PATH: &str = "/etc/battlepassd/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Progression ceiling. Experience past the cap still applies, but levels
    /// beyond it are discarded rather than rejected.
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Seed the stock reward catalog into an empty database at startup.
    #[serde(default)]
    pub seed_defaults: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8064".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("/var/lib/battlepassd/battlepass.db")
}

fn default_max_level() -> u32 {
    100
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            db_path: default_db_path(),
            max_level: default_max_level(),
            seed_defaults: false,
        }
    }
}

impl DaemonConfig {
    /// Loads the config file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
