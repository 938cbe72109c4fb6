use super::utils::{load_config, open_store, truncate};
use anyhow::Result;
use brandlog_core::analytics::{AnalyticsSummary, matches_search};
use brandlog_core::record::SessionLogRecord;
use brandlog_infrastructure::LocalLogStore;

fn load_logs() -> Result<Vec<SessionLogRecord>> {
    let config = load_config()?;
    let store = LocalLogStore::new(open_store(&config)?).with_capacity(config.storage.ring_capacity);
    Ok(store.recent_logs()?)
}

pub fn list(search: Option<&str>) -> Result<()> {
    let logs = load_logs()?;
    let matching: Vec<_> = logs
        .iter()
        .rev()
        .filter(|record| search.is_none_or(|term| matches_search(record, term)))
        .collect();

    if matching.is_empty() {
        println!("No session logs found.");
        return Ok(());
    }

    println!(
        "{:<40} {:<20} {:<20} {:<25} {:>10}",
        "SESSION", "NAME", "INDUSTRY", "STARTED", "DURATION"
    );
    for record in &matching {
        println!("{}", format_row(record));
    }
    println!("\n{} of {} session(s)", matching.len(), logs.len());

    Ok(())
}

pub fn summary() -> Result<()> {
    let logs = load_logs()?;
    let summary = AnalyticsSummary::from_records(&logs);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn format_row(record: &SessionLogRecord) -> String {
    let duration = record
        .total_duration()
        .map(|ms| format!("{}s", (ms as f64 / 1000.0).round() as i64))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "{:<40} {:<20} {:<20} {:<25} {:>10}",
        record.session_id,
        truncate(&record.user_info.name, 20),
        truncate(record.user_info.industry.as_deref().unwrap_or("-"), 20),
        record.timing.session_start.format("%Y-%m-%d %H:%M:%S UTC"),
        duration
    )
}
