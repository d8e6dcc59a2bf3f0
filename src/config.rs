//! Configuration loaded from `config.toml`
//!
//! Lookup order for the file:
//!   1. an explicit path passed by the caller
//!   2. the `CLASSROOM_CONFIG` environment variable
//!   3. `<local data dir>/pocket-classroom/config.toml`
//!
//! A missing file means defaults. `CLASSROOM_DATA_DIR` overrides `data_dir`.
//!
//! ```toml
//! data_dir = "/home/me/.local/share/pocket-classroom/store"
//! quota_bytes = 5242880
//! seed_sample = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::kv::DEFAULT_QUOTA_BYTES;

pub const CONFIG_ENV: &str = "CLASSROOM_CONFIG";
pub const DATA_DIR_ENV: &str = "CLASSROOM_DATA_DIR";
const APP_DIR: &str = "pocket-classroom";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassroomConfig {
    /// Directory holding the key-value store
    pub data_dir: Option<PathBuf>,
    /// Storage capacity in bytes
    pub quota_bytes: u64,
    /// Save the demo capsule when the library is empty
    pub seed_sample: bool,
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
            seed_sample: true,
        }
    }
}

impl ClassroomConfig {
    /// Base application directory (e.g., ~/.local/share/pocket-classroom)
    pub fn default_app_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(p) => Some(PathBuf::from(p)),
                None => Self::default_app_dir().ok().map(|d| d.join("config.toml")),
            },
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Directory of the store, resolved against the default location
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::default_app_dir()?.join("store")),
        }
    }
}
