use super::utils::{load_config, open_store};
use anyhow::Result;
use brandlog_core::failure::FailureCategory;
use brandlog_infrastructure::LocalFailureQueue;

pub fn list(category: Option<FailureCategory>) -> Result<()> {
    let config = load_config()?;
    let queue = LocalFailureQueue::new(open_store(&config)?);

    let categories: Vec<FailureCategory> = match category {
        Some(category) => vec![category],
        None => FailureCategory::ALL.to_vec(),
    };

    for category in categories {
        let entries = queue.entries(category)?;
        println!("{} ({} entries)", category.storage_key(), entries.len());
        for entry in entries {
            println!(
                "  {} {:<14} {:<40} {}",
                entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                entry.sink.label(),
                entry.record.session_id,
                entry.error
            );
        }
    }

    Ok(())
}
