//! Local durable store: the baseline sink.
//!
//! Keeps a capped ring buffer of the most recent session logs under the
//! `brandagent_logs` key. The oldest entries are evicted first.

use crate::storage::JsonKeyValueStore;
use async_trait::async_trait;
use brandlog_core::config::DEFAULT_RING_CAPACITY;
use brandlog_core::error::Result;
use brandlog_core::record::SessionLogRecord;
use brandlog_core::sink::{SessionSink, SinkKind, SinkOutcome};

/// Key holding the ring buffer of recent session logs.
pub const LOGS_KEY: &str = "brandagent_logs";

pub struct LocalLogStore {
    store: JsonKeyValueStore,
    capacity: usize,
}

impl LocalLogStore {
    pub fn new(store: JsonKeyValueStore) -> Self {
        Self {
            store,
            capacity: DEFAULT_RING_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `record` and trims the buffer to capacity.
    ///
    /// An unreadable buffer is set aside and restarted, so one bad file
    /// cannot fail every later write. Returns the number of records evicted.
    pub fn append(&self, record: &SessionLogRecord) -> Result<usize> {
        let capacity = self.capacity;
        let (evicted, reset) =
            self.store
                .update_or_reset(LOGS_KEY, Vec::<SessionLogRecord>::new(), |logs| {
                    logs.push(record.clone());
                    let excess = logs.len().saturating_sub(capacity);
                    logs.drain(..excess);
                    excess
                })?;
        if reset {
            tracing::warn!(
                session_id = %record.session_id,
                "[LocalLogStore] Stored logs were unreadable; started a new buffer"
            );
        }
        Ok(evicted)
    }

    /// Stored logs, oldest first.
    pub fn recent_logs(&self) -> Result<Vec<SessionLogRecord>> {
        Ok(self.store.get(LOGS_KEY)?.unwrap_or_default())
    }
}

#[async_trait]
impl SessionSink for LocalLogStore {
    fn kind(&self) -> SinkKind {
        SinkKind::LocalStore
    }

    async fn attempt(&self, record: &SessionLogRecord) -> SinkOutcome {
        match self.append(record) {
            Ok(evicted) => {
                tracing::debug!(
                    session_id = %record.session_id,
                    evicted,
                    "[LocalLogStore] Log stored locally"
                );
                SinkOutcome::Success
            }
            Err(e) => {
                tracing::error!(
                    session_id = %record.session_id,
                    "[LocalLogStore] Failed to store log locally: {}",
                    e
                );
                SinkOutcome::failure(e)
            }
        }
    }
}
