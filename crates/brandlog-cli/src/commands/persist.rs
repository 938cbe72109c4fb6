use super::utils::load_config;
use anyhow::{Context, Result};
use brandlog_application::SessionLogService;
use brandlog_core::record::{FinalizedRecord, SessionLogRecord};
use std::path::Path;

/// Persists a previously exported session log through every sink.
pub async fn run(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let record: SessionLogRecord = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a session log record", file.display()))?;

    let config = load_config()?;
    let service = SessionLogService::from_config(&config)?;

    let report = service.persist(FinalizedRecord::from_record(record)).await?;

    println!("{}", report.status_message());
    for (sink, reason) in report.failed_sinks() {
        println!("  {} failed: {}", sink, reason);
    }

    Ok(())
}
