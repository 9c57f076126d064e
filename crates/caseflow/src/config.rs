//! Configuration parsing.
//!
//! Reads firm settings from `~/.caseflow/config.toml` (or an explicit
//! `--config` path). A missing file is not an error: every field has a
//! documented placeholder default.

use caseflow_consolidate::FirmSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Error type for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level config file shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CaseflowConfig {
    pub firm: FirmSettings,
}

/// Default config location under the user's home directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".caseflow").join("config.toml"))
}

/// Load config from `path`, or from the default location when `None`.
/// Falls back to defaults when no file exists.
pub fn load_config(path: Option<&Path>) -> Result<CaseflowConfig> {
    let resolved = match path {
        Some(explicit) => Some(explicit.to_path_buf()),
        None => default_config_path(),
    };

    let Some(config_path) = resolved else {
        warn!("no home directory; using default settings");
        return Ok(CaseflowConfig::default());
    };

    if !config_path.exists() {
        debug!(
            "config not found at {}, using defaults",
            config_path.display()
        );
        return Ok(CaseflowConfig::default());
    }

    let raw = std::fs::read_to_string(&config_path)?;
    let config = toml::from_str(&raw)?;
    debug!("loaded config from {}", config_path.display());
    Ok(config)
}
