//! Unified path management for brandlog files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/brandlog/          # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/brandlog/     # Data directory
//! └── store/                   # Local key-value area (one JSON file per key)
//! ```

use brandlog_core::config::StorageConfig;
use std::path::PathBuf;

const APP_DIR: &str = "brandlog";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct BrandlogPaths;

impl BrandlogPaths {
    /// e.g. `~/.config/brandlog/`
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// e.g. `~/.config/brandlog/config.toml`
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// e.g. `~/.local/share/brandlog/`
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Default location of the local key-value area.
    pub fn store_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store"))
    }

    /// The configured `data_dir`, else [`Self::store_dir`].
    pub fn resolve_store_dir(storage: &StorageConfig) -> Result<PathBuf, PathError> {
        match &storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::store_dir(),
        }
    }
}
