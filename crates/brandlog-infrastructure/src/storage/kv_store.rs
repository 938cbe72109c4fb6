//! Local persistent key-value area.
//!
//! Each key maps to one JSON file in the store directory:
//!
//! ```text
//! data_dir/
//! ├── brandagent_logs.json
//! ├── brandagent_failed_logs.json
//! └── brandagent_failed_sessions.json
//! ```

use super::atomic_json::AtomicJsonFile;
use brandlog_core::error::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonKeyValueStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl JsonKeyValueStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            quota_bytes: None,
        }
    }

    /// Rejects writes whose serialized value exceeds `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    fn file<T>(&self, key: &str) -> AtomicJsonFile<T>
    where
        T: Serialize + DeserializeOwned,
    {
        AtomicJsonFile::new(self.dir.join(format!("{}.json", key))).with_quota(self.quota_bytes)
    }

    /// Reads a key. `Ok(None)` when it was never written.
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.file(key).load().map_err(|e| e.into_brandlog(key))
    }

    /// Locked read-modify-write of one key.
    pub fn update<T, F, R>(&self, key: &str, default_value: T, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> R,
    {
        self.file(key)
            .update(default_value, f)
            .map_err(|e| e.into_brandlog(key))
    }

    /// Locked read-modify-write that replaces an unreadable value with
    /// `default_value`. Returns `f`'s result and whether a reset happened.
    pub fn update_or_reset<T, F, R>(&self, key: &str, default_value: T, f: F) -> Result<(R, bool)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> R,
    {
        self.file(key)
            .update_or_reset(default_value, f)
            .map_err(|e| e.into_brandlog(key))
    }
}
