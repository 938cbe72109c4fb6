use anyhow::{Context, Result};
use brandlog_core::config::BrandlogConfig;
use brandlog_infrastructure::{BrandlogPaths, ConfigService, JsonKeyValueStore};
use std::path::PathBuf;

/// Loads the configuration from the default location plus environment.
pub fn load_config() -> Result<BrandlogConfig> {
    let service = ConfigService::new_default().context("Failed to locate config file")?;
    service
        .get_config()
        .with_context(|| format!("Failed to load {}", service.path().display()))
}

pub fn store_dir(config: &BrandlogConfig) -> Result<PathBuf> {
    BrandlogPaths::resolve_store_dir(&config.storage).context("Failed to resolve data directory")
}

pub fn open_store(config: &BrandlogConfig) -> Result<JsonKeyValueStore> {
    Ok(JsonKeyValueStore::new(store_dir(config)?).with_quota(config.storage.quota_bytes))
}

/// Truncates `text` to `max` chars for table output.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Dana", 10), "Dana");
        assert_eq!(truncate("Consumer Electronics", 8), "Consume…");
    }
}
