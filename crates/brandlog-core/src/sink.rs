//! Sink contract shared by every persistence/notification destination.

use crate::record::{ExternalService, SessionLogRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the destinations a session log is fanned out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Local JSON key-value area (the baseline)
    LocalStore,
    /// Summary collection + full-record blob store
    RemoteDocumentStore,
    /// Digest sent to the notification/export endpoint
    Notification,
}

impl SinkKind {
    /// Storage-method label shown in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LocalStore => "localStorage",
            Self::RemoteDocumentStore => "firebase",
            Self::Notification => "email_api",
        }
    }

    /// The external service an attempt on this sink is recorded under.
    pub fn service(&self) -> ExternalService {
        match self {
            Self::LocalStore => ExternalService::LocalStorage,
            Self::RemoteDocumentStore => ExternalService::Firebase,
            Self::Notification => ExternalService::Email,
        }
    }

    /// Action name recorded for an attempt on this sink.
    pub fn action(&self) -> &'static str {
        match self {
            Self::LocalStore => "store_log_locally",
            Self::RemoteDocumentStore => "store_session_log",
            Self::Notification => "send_log_email",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one sink attempt. A sink never reports partial success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SinkOutcome {
    Success,
    Failure(String),
}

impl SinkOutcome {
    pub fn failure(reason: impl fmt::Display) -> Self {
        Self::Failure(reason.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure(reason) => Some(reason),
        }
    }
}

impl<E: fmt::Display> From<Result<(), E>> for SinkOutcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => Self::failure(e),
        }
    }
}

/// A destination for finalized session logs.
///
/// Implementations must catch every internal failure and report it as
/// [`SinkOutcome::Failure`]; nothing escapes an attempt.
#[async_trait]
pub trait SessionSink: Send + Sync {
    fn kind(&self) -> SinkKind;

    async fn attempt(&self, record: &SessionLogRecord) -> SinkOutcome;
}
