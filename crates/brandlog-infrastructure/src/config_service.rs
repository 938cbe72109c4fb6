//! Configuration service.
//!
//! Loads `BrandlogConfig` from `~/.config/brandlog/config.toml`, then
//! applies `BRANDLOG_*` environment overrides. A missing file yields the
//! defaults (local store only; remote and notification sinks unconfigured).

use crate::paths::BrandlogPaths;
use brandlog_core::BrandlogError;
use brandlog_core::config::{BrandlogConfig, NotificationConfig, RemoteStoreConfig};
use brandlog_core::error::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<BrandlogConfig>>>,
}

impl ConfigService {
    /// Uses the default config file location.
    pub fn new_default() -> Result<Self> {
        let path = BrandlogPaths::config_file().map_err(|e| BrandlogError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<BrandlogConfig> {
        if let Ok(read_lock) = self.config.read() {
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = load_file(&self.path)?;
        apply_env_overrides(&mut loaded, |name| std::env::var(name).ok())?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }
}

fn load_file(path: &Path) -> Result<BrandlogConfig> {
    if !path.exists() {
        tracing::debug!("[ConfigService] No config at {:?}, using defaults", path);
        return Ok(BrandlogConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Applies `BRANDLOG_*` variables on top of `config`.
///
/// `lookup` resolves a variable name; tests pass a map instead of the
/// process environment.
pub fn apply_env_overrides<F>(config: &mut BrandlogConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("BRANDLOG_DATA_DIR") {
        config.storage.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(capacity) = lookup("BRANDLOG_RING_CAPACITY") {
        config.storage.ring_capacity = parse_number("BRANDLOG_RING_CAPACITY", &capacity)?;
    }
    if let Some(quota) = lookup("BRANDLOG_QUOTA_BYTES") {
        config.storage.quota_bytes = Some(parse_number("BRANDLOG_QUOTA_BYTES", &quota)?);
    }

    if let Some(base_url) = lookup("BRANDLOG_REMOTE_URL") {
        let project_id = lookup("BRANDLOG_REMOTE_PROJECT")
            .or_else(|| config.remote.as_ref().map(|r| r.project_id.clone()))
            .ok_or_else(|| {
                BrandlogError::config("BRANDLOG_REMOTE_URL is set but BRANDLOG_REMOTE_PROJECT is not")
            })?;
        let api_key = lookup("BRANDLOG_REMOTE_API_KEY")
            .or_else(|| config.remote.as_ref().and_then(|r| r.api_key.clone()));
        config.remote = Some(RemoteStoreConfig {
            base_url,
            project_id,
            api_key,
        });
    } else if let Some(remote) = config.remote.as_mut() {
        if let Some(api_key) = lookup("BRANDLOG_REMOTE_API_KEY") {
            remote.api_key = Some(api_key);
        }
    }

    if let Some(endpoint) = lookup("BRANDLOG_NOTIFY_URL") {
        let timeout_secs = config
            .notification
            .as_ref()
            .map(|n| n.timeout_secs)
            .unwrap_or(NotificationConfig::new("").timeout_secs);
        config.notification = Some(NotificationConfig {
            endpoint,
            timeout_secs,
        });
    }
    if let Some(secs) = lookup("BRANDLOG_NOTIFY_TIMEOUT_SECS") {
        let secs = parse_number("BRANDLOG_NOTIFY_TIMEOUT_SECS", &secs)?;
        if let Some(notification) = config.notification.as_mut() {
            notification.timeout_secs = secs;
        }
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BrandlogError::config(format!("{} must be a number, got '{}'", name, value)))
}
