//! Notification/export channel sink.
//!
//! Sends a condensed digest plus the full record to an external
//! notification endpoint with a bounded client-side timeout.

use crate::http::{error_from_response, from_reqwest};
use async_trait::async_trait;
use brandlog_core::BrandlogError;
use brandlog_core::config::NotificationConfig;
use brandlog_core::digest::{format_digest, subject};
use brandlog_core::error::Result;
use brandlog_core::record::SessionLogRecord;
use brandlog_core::sink::{SessionSink, SinkKind, SinkOutcome};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationRequest<'a> {
    log: &'a SessionLogRecord,
    email_content: String,
    subject: String,
}

pub struct NotificationChannel {
    client: Client,
    config: Option<NotificationConfig>,
}

impl NotificationChannel {
    pub fn new(config: Option<NotificationConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// POSTs `{log, emailContent, subject}`; the whole exchange, body
    /// included, must finish within the configured timeout.
    pub async fn send(&self, record: &SessionLogRecord) -> Result<()> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| BrandlogError::not_configured("notification channel"))?;
        let timeout = config.timeout();

        let payload = NotificationRequest {
            log: record,
            email_content: format_digest(record),
            subject: subject(record),
        };

        let exchange = async {
            let response = self
                .client
                .post(&config.endpoint)
                .json(&payload)
                .send()
                .await
                .map_err(|e| from_reqwest(e, "notification request", Some(timeout)))?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }
            Ok(())
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(BrandlogError::timeout("notification request", timeout)),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.config.as_ref().map(NotificationConfig::timeout)
    }
}

#[async_trait]
impl SessionSink for NotificationChannel {
    fn kind(&self) -> SinkKind {
        SinkKind::Notification
    }

    async fn attempt(&self, record: &SessionLogRecord) -> SinkOutcome {
        match self.send(record).await {
            Ok(()) => {
                tracing::info!(
                    session_id = %record.session_id,
                    "[NotificationChannel] Log digest sent"
                );
                SinkOutcome::Success
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %record.session_id,
                    "[NotificationChannel] Failed to send log digest: {}",
                    e
                );
                SinkOutcome::failure(e)
            }
        }
    }
}
