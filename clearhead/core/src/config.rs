use crate::gesture::GestureThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "clearhead";
/// Prefix of environment variable overrides, e.g. `CLEARHEAD_STORAGE__DIR`.
pub const ENV_PREFIX: &str = "CLEARHEAD";

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gestures: GestureThresholds,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory the file-backed key-value storage writes into.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

impl Config {
    /// Loads `clearhead.{toml,yaml,json,...}` from the working directory if present,
    /// then applies `CLEARHEAD_*` environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Loads the given file, which must exist, then applies environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".clearhead")
}
