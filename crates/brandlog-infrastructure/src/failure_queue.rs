//! File-backed failure queue.
//!
//! Entries are appended, uncapped, to the key of their category and are
//! only ever read back for manual inspection.

use crate::storage::JsonKeyValueStore;
use async_trait::async_trait;
use brandlog_core::error::Result;
use brandlog_core::failure::{FailureCategory, FailureEntry, FailureQueue};
use brandlog_core::record::SessionLogRecord;
use brandlog_core::sink::SinkKind;
use chrono::Utc;

pub struct LocalFailureQueue {
    store: JsonKeyValueStore,
}

impl LocalFailureQueue {
    pub fn new(store: JsonKeyValueStore) -> Self {
        Self { store }
    }

    /// All entries recorded for `category`, oldest first.
    pub fn entries(&self, category: FailureCategory) -> Result<Vec<FailureEntry>> {
        Ok(self.store.get(category.storage_key())?.unwrap_or_default())
    }

    fn append(&self, entry: FailureEntry) -> Result<()> {
        self.store.update(
            entry.category.storage_key(),
            Vec::<FailureEntry>::new(),
            |entries| entries.push(entry),
        )
    }
}

#[async_trait]
impl FailureQueue for LocalFailureQueue {
    async fn enqueue(
        &self,
        category: FailureCategory,
        sink: SinkKind,
        record: &SessionLogRecord,
        error: &str,
    ) {
        let entry = FailureEntry {
            category,
            sink,
            error: error.to_string(),
            recorded_at: Utc::now(),
            record: record.clone(),
        };

        match self.append(entry) {
            Ok(()) => tracing::info!(
                session_id = %record.session_id,
                key = category.storage_key(),
                "[FailureQueue] Queued failed {} attempt",
                sink
            ),
            // Last line of defense: nothing to fall back to.
            Err(e) => tracing::error!(
                session_id = %record.session_id,
                key = category.storage_key(),
                "[FailureQueue] Failed to queue failed {} attempt: {}",
                sink,
                e
            ),
        }
    }
}
