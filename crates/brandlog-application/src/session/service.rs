use crate::fan_out::FanOutCoordinator;
use brandlog_core::BrandlogError;
use brandlog_core::config::BrandlogConfig;
use brandlog_core::error::Result;
use brandlog_core::persist::{PersistFailure, PersistReport};
use brandlog_core::record::{FinalizedRecord, SessionContext, SessionStart};
use brandlog_infrastructure::{
    BrandlogPaths, JsonKeyValueStore, LocalFailureQueue, LocalLogStore, NotificationChannel,
    RemoteDocumentStore,
};
use std::path::Path;
use std::sync::Arc;

/// Entry point for session logging.
///
/// Owns the fan-out coordinator; callers only see contexts, reports
/// and failures.
pub struct SessionLogService {
    coordinator: FanOutCoordinator,
}

impl SessionLogService {
    pub fn new(coordinator: FanOutCoordinator) -> Self {
        Self { coordinator }
    }

    /// Wires the local store (baseline), remote document store and
    /// notification channel from `config`.
    ///
    /// Unconfigured remote sinks are still attempted so their absence is
    /// reported and queued.
    pub fn from_config(config: &BrandlogConfig) -> Result<Self> {
        let dir = BrandlogPaths::resolve_store_dir(&config.storage)
            .map_err(|e| BrandlogError::config(e.to_string()))?;
        Ok(Self::from_config_in(config, &dir))
    }

    /// Same as [`Self::from_config`] with an explicit store directory.
    pub fn from_config_in(config: &BrandlogConfig, store_dir: &Path) -> Self {
        let store = JsonKeyValueStore::new(store_dir).with_quota(config.storage.quota_bytes);

        let local = LocalLogStore::new(store.clone()).with_capacity(config.storage.ring_capacity);
        let failure_queue = LocalFailureQueue::new(store);

        let coordinator = FanOutCoordinator::new(Arc::new(local), Arc::new(failure_queue))
            .with_sink(Arc::new(RemoteDocumentStore::new(config.remote.clone())))
            .with_sink(Arc::new(NotificationChannel::new(
                config.notification.clone(),
            )));

        tracing::debug!(
            store_dir = %store_dir.display(),
            remote = config.remote.is_some(),
            notification = config.notification.is_some(),
            "[SessionLogService] Initialized"
        );

        Self::new(coordinator)
    }

    pub fn coordinator(&self) -> &FanOutCoordinator {
        &self.coordinator
    }

    pub fn start_session(&self, start: SessionStart) -> SessionContext {
        let ctx = SessionContext::start(start);
        tracing::info!(session_id = %ctx.session_id(), "[SessionLogService] Session started");
        ctx
    }

    /// Finalizes `ctx` and persists the record.
    pub async fn end_session(
        &self,
        ctx: SessionContext,
    ) -> std::result::Result<PersistReport, PersistFailure> {
        self.persist(ctx.finalize()).await
    }

    /// Persists an already finalized record.
    pub async fn persist(
        &self,
        record: FinalizedRecord,
    ) -> std::result::Result<PersistReport, PersistFailure> {
        self.coordinator.persist(record).await
    }
}
