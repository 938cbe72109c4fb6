//! Session log record domain model.
//!
//! The record is a plain serde aggregate. It is only mutated through a
//! [`SessionContext`](super::SessionContext); once finalized it is wrapped in a
//! [`FinalizedRecord`](super::FinalizedRecord) and never changes again.
//!
//! The JSON representation uses camelCase keys, matching what the sinks
//! and the notification endpoint expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One user session, from form submission to analysis completion or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogRecord {
    /// Opaque unique identifier, stable for the record's lifetime
    pub session_id: String,
    /// Creation time (session start)
    pub timestamp: DateTime<Utc>,
    pub user_info: UserInfo,
    pub timing: Timing,
    pub interactions: Interactions,
    pub system_events: SystemEvents,
    pub outputs: Outputs,
    pub performance: Performance,
}

/// Who the session belongs to and where the client came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ClientLocation>,
}

/// Client page location at session start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLocation {
    pub url: String,
    #[serde(default)]
    pub pathname: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub referrer: String,
}

/// Session timing. Durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub session_start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_complete: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<i64>,
    #[serde(default)]
    pub step_durations: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactions {
    /// Snapshot of the submitted form, taken once at session start
    pub form_submission: Value,
    #[serde(default)]
    pub interactive_answers: BTreeMap<String, InteractiveAnswer>,
    #[serde(default)]
    pub additional_insights: Map<String, Value>,
    #[serde(default)]
    pub button_clicks: Vec<ButtonClick>,
    #[serde(default)]
    pub page_views: Vec<PageView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveAnswer {
    pub answer: Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonClick {
    pub action: String,
    pub element: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub page: String,
    pub timestamp: DateTime<Utc>,
    /// Set once the view is superseded by the next one (or the session ends)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemEvents {
    #[serde(default)]
    pub api_calls: Vec<ApiCall>,
    #[serde(default)]
    pub rag_updates: Vec<RagUpdate>,
    #[serde(default)]
    pub external_services: Vec<ExternalServiceCall>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCall {
    pub endpoint: String,
    pub method: String,
    pub timestamp: DateTime<Utc>,
    pub duration: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagUpdateKind {
    ProfileAnalysis,
    ContentGeneration,
    RecommendationUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagUpdate {
    #[serde(rename = "type")]
    pub kind: RagUpdateKind,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
    pub success: bool,
}

/// External collaborators a session may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalService {
    Openai,
    Exa,
    Email,
    Firebase,
    LocalStorage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalServiceCall {
    pub service: ExternalService,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outputs {
    /// Final analysis result; `null` until the analysis completes
    #[serde(default)]
    pub analysis_results: Option<Value>,
    #[serde(default)]
    pub recommendations: Vec<Value>,
    #[serde(default)]
    pub generated_content: Option<Value>,
    #[serde(default)]
    pub exported_documents: Vec<ExportedDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_scheduled: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedDocument {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    #[serde(default)]
    pub load_times: BTreeMap<String, u64>,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub warning_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<u64>,
}

impl SessionLogRecord {
    /// Returns a copy with every opaque payload run through the sanitizer.
    ///
    /// Typed fields carry no free-form keys and are copied as-is.
    pub fn sanitized(&self) -> SessionLogRecord {
        use crate::sanitize::sanitize;

        let mut copy = self.clone();
        copy.interactions.form_submission = sanitize(&self.interactions.form_submission);
        for answer in copy.interactions.interactive_answers.values_mut() {
            answer.answer = sanitize(&answer.answer);
        }
        copy.interactions.additional_insights =
            match sanitize(&Value::Object(self.interactions.additional_insights.clone())) {
                Value::Object(map) => map,
                _ => Map::new(),
            };
        for update in &mut copy.system_events.rag_updates {
            update.data = sanitize(&update.data);
        }
        copy.outputs.analysis_results = self.outputs.analysis_results.as_ref().map(sanitize);
        copy.outputs.recommendations = self.outputs.recommendations.iter().map(sanitize).collect();
        copy.outputs.generated_content = self.outputs.generated_content.as_ref().map(sanitize);
        copy.outputs.follow_up_scheduled = self.outputs.follow_up_scheduled.as_ref().map(sanitize);
        copy
    }

    /// Total session duration in milliseconds, if known.
    pub fn total_duration(&self) -> Option<i64> {
        self.timing.total_duration
    }

    pub fn is_completed(&self) -> bool {
        self.outputs.analysis_results.is_some() && self.timing.analysis_complete.is_some()
    }
}
