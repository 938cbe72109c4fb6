//! Fan-out coordinator.
//!
//! Persists one finalized session log to every configured sink. The
//! baseline sink runs first; the secondaries then run concurrently. Any
//! failed attempt is filed in the failure queue. Only a baseline failure
//! fails the persist as a whole.

use brandlog_core::failure::{FailureCategory, FailureQueue};
use brandlog_core::persist::{PersistAttemptLog, PersistFailure, PersistReport, SinkAttempt};
use brandlog_core::record::FinalizedRecord;
use brandlog_core::sink::{SessionSink, SinkKind, SinkOutcome};
use futures::future::join_all;
use std::sync::Arc;

/// Coordinates a best-effort write of one record to all sinks.
///
/// # Example
///
/// ```ignore
/// let coordinator = FanOutCoordinator::new(local_store, failure_queue)
///     .with_sink(remote_store)
///     .with_sink(notification_channel);
///
/// let report = coordinator.persist(ctx.finalize()).await?;
/// println!("{}", report.status_message());
/// ```
pub struct FanOutCoordinator {
    baseline: Arc<dyn SessionSink>,
    secondaries: Vec<Arc<dyn SessionSink>>,
    failure_queue: Arc<dyn FailureQueue>,
}

impl FanOutCoordinator {
    /// Creates a coordinator whose persists succeed iff `baseline` does.
    pub fn new(baseline: Arc<dyn SessionSink>, failure_queue: Arc<dyn FailureQueue>) -> Self {
        Self {
            baseline,
            secondaries: Vec::new(),
            failure_queue,
        }
    }

    /// Adds a best-effort sink.
    pub fn with_sink(mut self, sink: Arc<dyn SessionSink>) -> Self {
        self.secondaries.push(sink);
        self
    }

    pub fn baseline_kind(&self) -> SinkKind {
        self.baseline.kind()
    }

    /// Number of sinks a persist attempts, baseline included.
    pub fn sink_count(&self) -> usize {
        1 + self.secondaries.len()
    }

    /// Fans `record` out to every sink.
    ///
    /// Every sink is attempted even when the baseline fails. Failed
    /// attempts are queued before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`PersistFailure`] when the baseline sink failed; the
    /// carried report still lists every attempt.
    pub async fn persist(&self, record: FinalizedRecord) -> Result<PersistReport, PersistFailure> {
        let session_id = record.session_id().to_string();
        tracing::debug!(
            session_id = %session_id,
            sinks = self.sink_count(),
            "[FanOut] Persisting session log"
        );

        let baseline_kind = self.baseline.kind();
        let baseline_outcome = self.baseline.attempt(&record).await;

        let shared = &*record;
        let secondary_outcomes = join_all(
            self.secondaries
                .iter()
                .map(|sink| async move { (sink.kind(), sink.attempt(shared).await) }),
        )
        .await;

        let mut attempts = Vec::with_capacity(self.sink_count());
        attempts.push(SinkAttempt {
            sink: baseline_kind,
            outcome: baseline_outcome,
        });
        attempts.extend(
            secondary_outcomes
                .into_iter()
                .map(|(sink, outcome)| SinkAttempt { sink, outcome }),
        );

        let mut attempt_log = PersistAttemptLog::new();
        for attempt in &attempts {
            attempt_log.record(attempt.sink, &attempt.outcome);
            if let SinkOutcome::Failure(reason) = &attempt.outcome {
                self.failure_queue
                    .enqueue(
                        FailureCategory::for_sink(attempt.sink),
                        attempt.sink,
                        &record,
                        reason,
                    )
                    .await;
            }
        }

        let report = PersistReport {
            session_id,
            attempts,
            attempt_log,
        };

        let baseline_failure = report
            .outcome_of(baseline_kind)
            .and_then(SinkOutcome::error)
            .map(str::to_string);

        match baseline_failure {
            Some(reason) => {
                let failure = PersistFailure::new(baseline_kind, reason, report);
                tracing::error!(session_id = %failure.report.session_id, "[FanOut] {}", failure);
                Err(failure)
            }
            None => {
                let failed = report.failed_sinks();
                if failed.is_empty() {
                    tracing::info!(
                        session_id = %report.session_id,
                        "[FanOut] {}",
                        report.status_message()
                    );
                } else {
                    tracing::warn!(
                        session_id = %report.session_id,
                        failed = ?failed,
                        "[FanOut] {}",
                        report.status_message()
                    );
                }
                Ok(report)
            }
        }
    }
}
