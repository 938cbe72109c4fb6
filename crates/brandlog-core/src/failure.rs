//! Failure queue contract.
//!
//! The queue is append-only from the coordinator's side. Entries are kept
//! for manual inspection; nothing reads them back for automatic retry.

use crate::record::SessionLogRecord;
use crate::sink::SinkKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which holding area a failed attempt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Notification/export channel sends
    FailedNotification,
    /// Full-session persists (baseline or remote document store)
    FailedSessionPersist,
}

impl FailureCategory {
    pub const ALL: [FailureCategory; 2] = [Self::FailedNotification, Self::FailedSessionPersist];

    /// Local storage key holding this category's entries.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::FailedNotification => "brandagent_failed_logs",
            Self::FailedSessionPersist => "brandagent_failed_sessions",
        }
    }

    /// Category a failed attempt on `sink` is filed under.
    pub fn for_sink(sink: SinkKind) -> Self {
        match sink {
            SinkKind::Notification => Self::FailedNotification,
            SinkKind::LocalStore | SinkKind::RemoteDocumentStore => Self::FailedSessionPersist,
        }
    }
}

/// One failed attempt: the original record plus what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEntry {
    pub category: FailureCategory,
    pub sink: SinkKind,
    pub error: String,
    pub recorded_at: DateTime<Utc>,
    pub record: SessionLogRecord,
}

/// Durable holding area for failed persistence attempts.
#[async_trait]
pub trait FailureQueue: Send + Sync {
    /// Appends an entry. Never fails; storage problems are only logged.
    async fn enqueue(
        &self,
        category: FailureCategory,
        sink: SinkKind,
        record: &SessionLogRecord,
        error: &str,
    );
}
