//! Atomic JSON file operations.
//!
//! Provides a thin layer for safe concurrent access to the JSON files that
//! back the local key-value area.

use brandlog_core::BrandlogError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors that can occur during atomic JSON operations.
#[derive(Debug)]
pub enum AtomicJsonError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
    /// Serialized value is larger than the configured quota.
    QuotaExceeded { size: u64, limit: u64 },
}

impl std::fmt::Display for AtomicJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicJsonError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicJsonError::JsonError(e) => write!(f, "JSON error: {}", e),
            AtomicJsonError::LockError(e) => write!(f, "Lock error: {}", e),
            AtomicJsonError::QuotaExceeded { size, limit } => {
                write!(f, "Quota exceeded: {} bytes (limit {})", size, limit)
            }
        }
    }
}

impl std::error::Error for AtomicJsonError {}

impl From<std::io::Error> for AtomicJsonError {
    fn from(e: std::io::Error) -> Self {
        AtomicJsonError::IoError(e)
    }
}

impl From<serde_json::Error> for AtomicJsonError {
    fn from(e: serde_json::Error) -> Self {
        AtomicJsonError::JsonError(e)
    }
}

impl AtomicJsonError {
    /// Converts into the shared error type, attributing it to `key`.
    pub fn into_brandlog(self, key: &str) -> BrandlogError {
        match self {
            AtomicJsonError::IoError(e) => e.into(),
            AtomicJsonError::JsonError(e) => e.into(),
            AtomicJsonError::LockError(msg) => BrandlogError::Lock(msg),
            AtomicJsonError::QuotaExceeded { size, limit } => BrandlogError::QuotaExceeded {
                key: key.to_string(),
                size,
                limit,
            },
        }
    }
}

/// A handle to a JSON file written atomically.
///
/// - Updates are all-or-nothing via a per-write tmp file + atomic rename
/// - Read-modify-write cycles hold an exclusive lock on a sibling
///   `.lock` file, which is never removed
/// - Data is fsynced before the rename
/// - An optional byte quota rejects oversized values before writing
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    max_bytes: Option<u64>,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            max_bytes: None,
            _phantom: PhantomData,
        }
    }

    /// Limits the serialized size of the file.
    pub fn with_quota(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data to the file atomically.
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        let json = serde_json::to_string(data)?;

        if let Some(limit) = self.max_bytes {
            let size = json.len() as u64;
            if size > limit {
                return Err(AtomicJsonError::QuotaExceeded { size, limit });
            }
        }

        let parent = self.parent_dir()?;
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_file = NamedTempFile::new_in(parent)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.as_file().sync_all()?;
        tmp_file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Performs a locked read-modify-write.
    ///
    /// `default_value` is used when the file doesn't exist. The data `f`
    /// leaves behind is written back atomically and `f`'s result returned.
    pub fn update<F, R>(&self, default_value: T, f: F) -> Result<R, AtomicJsonError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let _lock = self.acquire_lock()?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data);
        self.save(&data)?;

        Ok(result)
    }

    /// Like [`Self::update`], but an unparseable file is moved aside to
    /// `{file}.corrupt` and `default_value` used in its place.
    ///
    /// Returns `f`'s result and whether a corrupt file was replaced.
    pub fn update_or_reset<F, R>(&self, default_value: T, f: F) -> Result<(R, bool), AtomicJsonError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let _lock = self.acquire_lock()?;

        let (loaded, reset) = match self.load() {
            Ok(loaded) => (loaded, false),
            Err(AtomicJsonError::JsonError(e)) => (self.set_aside(&e)?, true),
            Err(AtomicJsonError::IoError(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                (self.set_aside(&e)?, true)
            }
            Err(e) => return Err(e),
        };

        let mut data = loaded.unwrap_or(default_value);
        let result = f(&mut data);
        self.save(&data)?;

        Ok((result, reset))
    }

    fn parent_dir(&self) -> Result<&Path, AtomicJsonError> {
        self.path.parent().ok_or_else(|| {
            AtomicJsonError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })
    }

    /// Moves an unreadable file out of the way. Always yields `None`.
    fn set_aside(&self, reason: &dyn std::fmt::Display) -> Result<Option<T>, AtomicJsonError> {
        let aside = self.corrupt_path();
        tracing::warn!(
            "[AtomicJson] {:?} is unreadable ({}), moving it to {:?} and starting fresh",
            self.path,
            reason,
            aside
        );
        fs::rename(&self.path, &aside)?;
        Ok(None)
    }

    fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn acquire_lock(&self) -> Result<FileLock, AtomicJsonError> {
        FileLock::acquire(&self.path)
    }
}

/// A file lock guard; the lock is released when the handle closes.
///
/// The lock file stays on disk so every writer locks the same inode.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicJsonError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| AtomicJsonError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { _file: file })
    }
}
