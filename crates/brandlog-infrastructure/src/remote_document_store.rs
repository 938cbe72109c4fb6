//! Remote document store sink.
//!
//! Two-part write per session:
//! 1. the counts-only summary into the `session_logs` collection
//! 2. the full record into the blob namespace `logs/{sessionId}_{epochMillis}.json`
//!
//! Without configuration the sink reports failure without touching the network.

use crate::http::{error_from_response, from_reqwest, trim_base};
use async_trait::async_trait;
use brandlog_core::BrandlogError;
use brandlog_core::config::RemoteStoreConfig;
use brandlog_core::error::Result;
use brandlog_core::record::{SessionLogRecord, SessionLogSummary};
use brandlog_core::sink::{SessionSink, SinkKind, SinkOutcome};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

/// Collection holding one summary document per session.
pub const SUMMARY_COLLECTION: &str = "session_logs";

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    #[serde(default)]
    id: Option<String>,
}

pub struct RemoteDocumentStore {
    client: Client,
    config: Option<RemoteStoreConfig>,
}

impl RemoteDocumentStore {
    pub fn new(config: Option<RemoteStoreConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Blob path for a record written at `epoch_millis`.
    pub fn blob_path(session_id: &str, epoch_millis: i64) -> String {
        format!("logs/{}_{}.json", session_id, epoch_millis)
    }

    fn project_url(config: &RemoteStoreConfig) -> String {
        format!(
            "{}/projects/{}",
            trim_base(&config.base_url),
            config.project_id
        )
    }

    fn auth(
        config: &RemoteStoreConfig,
        request: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match &config.api_key {
            Some(api_key) => request.header("Authorization", format!("Bearer {}", api_key)),
            None => request,
        }
    }

    async fn write_summary(
        &self,
        config: &RemoteStoreConfig,
        record: &SessionLogRecord,
    ) -> Result<Option<String>> {
        let url = format!(
            "{}/collections/{}/documents",
            Self::project_url(config),
            SUMMARY_COLLECTION
        );
        let summary = SessionLogSummary::from(record);

        let response = Self::auth(config, self.client.post(&url).json(&summary))
            .send()
            .await
            .map_err(|e| from_reqwest(e, "summary write", None))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        // The document id is informational only.
        let created: Option<CreatedDocument> = response.json().await.ok();
        Ok(created.and_then(|c| c.id))
    }

    async fn write_blob(&self, config: &RemoteStoreConfig, record: &SessionLogRecord) -> Result<()> {
        let path = Self::blob_path(&record.session_id, Utc::now().timestamp_millis());
        let url = format!("{}/blobs/{}", Self::project_url(config), path);
        let body = serde_json::to_string_pretty(record)?;

        let response = Self::auth(
            config,
            self.client
                .put(&url)
                .header("Content-Type", "application/json")
                .body(body),
        )
        .send()
        .await
        .map_err(|e| from_reqwest(e, "blob upload", None))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        tracing::debug!(blob = %path, "[RemoteDocumentStore] Full session log uploaded");
        Ok(())
    }

    /// Writes summary then blob; either failing fails the store.
    pub async fn store(&self, record: &SessionLogRecord) -> Result<()> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| BrandlogError::not_configured("remote document store"))?;

        let document_id = self.write_summary(config, record).await?;
        tracing::debug!(
            session_id = %record.session_id,
            document_id = ?document_id,
            "[RemoteDocumentStore] Summary stored"
        );

        self.write_blob(config, record).await
    }
}

#[async_trait]
impl SessionSink for RemoteDocumentStore {
    fn kind(&self) -> SinkKind {
        SinkKind::RemoteDocumentStore
    }

    async fn attempt(&self, record: &SessionLogRecord) -> SinkOutcome {
        match self.store(record).await {
            Ok(()) => {
                tracing::info!(
                    session_id = %record.session_id,
                    "[RemoteDocumentStore] Log stored remotely"
                );
                SinkOutcome::Success
            }
            Err(e) if e.is_not_configured() => {
                tracing::debug!("[RemoteDocumentStore] Skipped: {}", e);
                SinkOutcome::failure(e)
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %record.session_id,
                    "[RemoteDocumentStore] Failed to store log: {}",
                    e
                );
                SinkOutcome::failure(e)
            }
        }
    }
}
