//! Player configuration.
//!
//! Values come from built-in defaults, optionally overridden by a TOML file,
//! then by command-line flags and environment variables (see `main.rs`).
//!
//! ```toml
//! presentation_dir = "talks/automata"
//! server_url = "http://localhost:3001"
//! probe_timeout_ms = 2000
//! request_timeout_ms = 10000
//! capture_flush_ms = 1000
//! log_level = "info"
//! ```

use crate::sync::DeepLink;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "slidecast.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Local directory or `http(s)` base URL holding `manifest.json`.
    pub presentation_dir: String,
    pub server_url: String,
    pub probe_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Interval between capture flushes while recording.
    pub capture_flush_ms: u64,
    pub log_level: String,
    #[serde(skip)]
    pub deep_link: DeepLink,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            presentation_dir: ".".to_string(),
            server_url: "http://localhost:3001".to_string(),
            probe_timeout_ms: 2_000,
            request_timeout_ms: 10_000,
            capture_flush_ms: 1_000,
            log_level: "info".to_string(),
            deep_link: DeepLink::default(),
        }
    }
}

impl PlayerConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    /// Without either, the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn capture_flush_interval(&self) -> Duration {
        Duration::from_millis(self.capture_flush_ms.max(1))
    }
}
