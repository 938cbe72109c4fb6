//! Aggregate results of a fan-out persist.

use crate::record::ExternalServiceCall;
use crate::sink::{SinkKind, SinkOutcome};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one sink within a persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkAttempt {
    pub sink: SinkKind,
    pub outcome: SinkOutcome,
}

/// Provenance of the persist attempts for one record.
///
/// Kept apart from the finalized record so the record itself never
/// changes after it is handed to the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistAttemptLog {
    entries: Vec<ExternalServiceCall>,
}

impl PersistAttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sink: SinkKind, outcome: &SinkOutcome) {
        self.entries.push(ExternalServiceCall {
            service: sink.service(),
            action: sink.action().to_string(),
            timestamp: Utc::now(),
            success: outcome.is_success(),
            error: outcome.error().map(str::to_string),
        });
    }

    pub fn entries(&self) -> &[ExternalServiceCall] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What happened when one record was fanned out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistReport {
    pub session_id: String,
    /// Attempts in the order they were started (baseline first)
    pub attempts: Vec<SinkAttempt>,
    pub attempt_log: PersistAttemptLog,
}

impl PersistReport {
    pub fn successful_sinks(&self) -> Vec<SinkKind> {
        self.attempts
            .iter()
            .filter(|a| a.outcome.is_success())
            .map(|a| a.sink)
            .collect()
    }

    pub fn failed_sinks(&self) -> Vec<(SinkKind, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| a.outcome.error().map(|e| (a.sink, e)))
            .collect()
    }

    pub fn succeeded_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.outcome.is_success()).count()
    }

    pub fn total(&self) -> usize {
        self.attempts.len()
    }

    pub fn outcome_of(&self, sink: SinkKind) -> Option<&SinkOutcome> {
        self.attempts
            .iter()
            .find(|a| a.sink == sink)
            .map(|a| &a.outcome)
    }

    /// Degraded-success message for the calling UI.
    pub fn status_message(&self) -> String {
        format!(
            "Log processed ({}/{} storage methods succeeded)",
            self.succeeded_count(),
            self.total()
        )
    }
}

/// The baseline sink failed, so the persist as a whole failed.
#[derive(Error, Debug, Clone)]
#[error("Critical: {baseline} failed ({reason}); {succeeded}/{total} storage methods succeeded")]
pub struct PersistFailure {
    pub baseline: SinkKind,
    pub reason: String,
    pub succeeded: usize,
    pub total: usize,
    pub report: PersistReport,
}

impl PersistFailure {
    pub fn new(baseline: SinkKind, reason: impl Into<String>, report: PersistReport) -> Self {
        Self {
            baseline,
            reason: reason.into(),
            succeeded: report.succeeded_count(),
            total: report.total(),
            report,
        }
    }
}
