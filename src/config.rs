//! Host configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default maximum depth of nested contract calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 16;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("max_call_depth must be at least 1")]
    InvalidCallDepth,
}

/// Local host settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory of the sled database (None = in-memory state)
    pub data_dir: Option<PathBuf>,
    /// Maximum depth of nested contract calls
    pub max_call_depth: usize,
    /// Log level for the CLI subscriber
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            log_level: "info".to_string(),
        }
    }
}

impl HostConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_call_depth == 0 {
            return Err(ConfigError::InvalidCallDepth);
        }
        Ok(())
    }
}
