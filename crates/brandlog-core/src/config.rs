use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Number of session logs kept in the local ring buffer.
pub const DEFAULT_RING_CAPACITY: usize = 50;

/// Client-side timeout for the notification channel.
pub const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 10;

/// Root configuration (`config.toml`).
///
/// Absent `remote`/`notification` sections mean the corresponding sink is
/// not configured and short-circuits without I/O.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct BrandlogConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: Option<RemoteStoreConfig>,
    #[serde(default)]
    pub notification: Option<NotificationConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Directory of the local key-value area; platform data dir when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: usize,
    /// Per-key size limit in bytes, if any
    #[serde(default)]
    pub quota_bytes: Option<u64>,
}

fn default_ring_capacity() -> usize {
    DEFAULT_RING_CAPACITY
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            ring_capacity: DEFAULT_RING_CAPACITY,
            quota_bytes: None,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    pub project_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl fmt::Debug for RemoteStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStoreConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NotificationConfig {
    pub endpoint: String,
    #[serde(default = "default_notification_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_notification_timeout_secs() -> u64 {
    DEFAULT_NOTIFICATION_TIMEOUT_SECS
}

impl NotificationConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: DEFAULT_NOTIFICATION_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: BrandlogConfig = toml::from_str("").unwrap();
        assert_eq!(config, BrandlogConfig::default());
        assert_eq!(config.storage.ring_capacity, 50);
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_full_toml() {
        let config: BrandlogConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/var/lib/brandlog"
            ring_capacity = 20

            [remote]
            base_url = "https://docs.example.com/v1"
            project_id = "brandagent"
            api_key = "k-123"

            [notification]
            endpoint = "https://brand.example/api/send-log-email"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.ring_capacity, 20);
        assert_eq!(config.remote.as_ref().unwrap().project_id, "brandagent");
        assert_eq!(
            config.notification.as_ref().unwrap().timeout(),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let remote = RemoteStoreConfig {
            base_url: "https://docs.example.com".to_string(),
            project_id: "p".to_string(),
            api_key: Some("super-secret".to_string()),
        };
        let printed = format!("{:?}", remote);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
