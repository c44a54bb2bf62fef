//! Registry configuration.
//!
//! Loaded from an optional JSON file. Every field has a default, so an empty object
//! (or no file at all) yields a working configuration.
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/food-registry",
//!   "list_scope": "owner",
//!   "quantity_update": "require_positive",
//!   "compact_after": 1024,
//!   "sync_writes": true,
//!   "channel_capacity": 32
//! }
//! ```

use crate::food_actor::{FoodPolicy, ListScope, QuantityUpdatePolicy};
use registry_framework::store::StoreOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = "./food-registry-data";
const DEFAULT_COMPACT_AFTER: usize = 1024;
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Directory holding `items.log` and `shared.log`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub list_scope: ListScope,

    #[serde(default)]
    pub quantity_update: QuantityUpdatePolicy,

    /// Minimum frame count before the item log is compacted.
    #[serde(default = "default_compact_after")]
    pub compact_after: usize,

    /// fsync after each append.
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,

    /// Actor request queue depth.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_compact_after() -> usize {
    DEFAULT_COMPACT_AFTER
}

fn default_sync_writes() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            list_scope: ListScope::default(),
            quantity_update: QuantityUpdatePolicy::default(),
            compact_after: DEFAULT_COMPACT_AFTER,
            sync_writes: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// A default configuration rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RegistryConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        if self.compact_after == 0 {
            return Err(ConfigError::Invalid(
                "compact_after must be greater than zero".into(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            sync_writes: self.sync_writes,
            compact_after: self.compact_after,
        }
    }

    pub fn policy(&self) -> FoodPolicy {
        FoodPolicy {
            list_scope: self.list_scope,
            quantity_update: self.quantity_update,
        }
    }
}
