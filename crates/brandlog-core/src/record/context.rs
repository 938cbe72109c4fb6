//! Session context: the only handle that can mutate a session log record.
//!
//! A context is created at session start, passed by reference to every
//! collaborator that needs to log, and consumed by [`SessionContext::finalize`].

use super::model::{
    ApiCall, ButtonClick, ClientLocation, DocumentKind, ExportedDocument, ExternalService,
    ExternalServiceCall, InteractiveAnswer, Interactions, Outputs, PageView, Performance,
    RagUpdate, RagUpdateKind, SessionLogRecord, SystemEvents, Timing, UserInfo,
};
use crate::sanitize::sanitize;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::Deref;
use std::time::Duration;

/// Page name logged when a session starts.
pub const SESSION_START_PAGE: &str = "session_start";

/// Information captured once when a session starts.
#[derive(Debug, Clone, Default)]
pub struct SessionStart {
    pub name: Option<String>,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub location: Option<ClientLocation>,
    /// Raw form payload; sanitized before it is stored
    pub form_submission: Value,
}

/// Mutable, exclusively owned view of an in-progress session log.
#[derive(Debug)]
pub struct SessionContext {
    record: SessionLogRecord,
}

impl SessionContext {
    /// Starts a session now.
    pub fn start(start: SessionStart) -> Self {
        Self::start_at(start, Utc::now())
    }

    /// Starts a session at an explicit time.
    pub fn start_at(start: SessionStart, at: DateTime<Utc>) -> Self {
        let session_id = generate_session_id(at);
        let name = start
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Anonymous".to_string());

        let record = SessionLogRecord {
            session_id,
            timestamp: at,
            user_info: UserInfo {
                name,
                email: start.email,
                industry: start.industry,
                ip_address: start.ip_address,
                user_agent: start.user_agent,
                location: start.location,
            },
            timing: Timing {
                session_start: at,
                analysis_start: None,
                analysis_complete: None,
                session_end: None,
                total_duration: None,
                step_durations: BTreeMap::new(),
            },
            interactions: Interactions {
                form_submission: sanitize(&start.form_submission),
                interactive_answers: BTreeMap::new(),
                additional_insights: Map::new(),
                button_clicks: Vec::new(),
                page_views: Vec::new(),
            },
            system_events: SystemEvents::default(),
            outputs: Outputs::default(),
            performance: Performance::default(),
        };

        tracing::info!(session_id = %record.session_id, "[Session] Started");

        let mut context = Self { record };
        context.log_page_view_at(SESSION_START_PAGE, at);
        context
    }

    pub fn session_id(&self) -> &str {
        &self.record.session_id
    }

    /// Read-only view of the in-progress record.
    pub fn record(&self) -> &SessionLogRecord {
        &self.record
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Logs an error and bumps the error counter.
    pub fn error(&mut self, message: &str) {
        tracing::error!(session_id = %self.record.session_id, "{}", message);
        self.record.performance.error_count += 1;
    }

    /// Logs a warning and bumps the warning counter.
    pub fn warn(&mut self, message: &str) {
        tracing::warn!(session_id = %self.record.session_id, "{}", message);
        self.record.performance.warning_count += 1;
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    pub fn log_page_view(&mut self, page: &str) {
        self.log_page_view_at(page, Utc::now());
    }

    /// Closes out the previous page view and opens a new one.
    pub fn log_page_view_at(&mut self, page: &str, at: DateTime<Utc>) {
        close_last_page_view(&mut self.record.interactions.page_views, at);
        self.record.interactions.page_views.push(PageView {
            page: page.to_string(),
            timestamp: at,
            duration: None,
        });
    }

    pub fn log_button_click(&mut self, action: &str, element: &str) {
        self.record.interactions.button_clicks.push(ButtonClick {
            action: action.to_string(),
            element: element.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Records (or replaces) the answer to one interactive question.
    pub fn log_interactive_answer(&mut self, question_id: &str, answer: Value) {
        self.record.interactions.interactive_answers.insert(
            question_id.to_string(),
            InteractiveAnswer {
                answer: sanitize(&answer),
                timestamp: Utc::now(),
            },
        );
    }

    /// Merges insights into the accumulated map; later keys win.
    pub fn log_additional_insights(&mut self, insights: Map<String, Value>) {
        let cleaned = match sanitize(&Value::Object(insights)) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let merged = &mut self.record.interactions.additional_insights;
        merged.extend(cleaned);
        merged.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
    }

    // ------------------------------------------------------------------
    // System events
    // ------------------------------------------------------------------

    /// Records one API call. `error: Some(_)` marks the call failed.
    pub fn log_api_call(
        &mut self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        error: Option<String>,
    ) {
        let success = error.is_none();
        self.record.system_events.api_calls.push(ApiCall {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            timestamp: Utc::now(),
            duration: duration.as_millis() as u64,
            success,
            error,
        });
        if !success {
            self.record.performance.error_count += 1;
        }
    }

    pub fn log_external_service(
        &mut self,
        service: ExternalService,
        action: &str,
        error: Option<String>,
    ) {
        self.record
            .system_events
            .external_services
            .push(ExternalServiceCall {
                service,
                action: action.to_string(),
                timestamp: Utc::now(),
                success: error.is_none(),
                error,
            });
    }

    pub fn log_rag_update(&mut self, kind: RagUpdateKind, data: &Value, success: bool) {
        self.record.system_events.rag_updates.push(RagUpdate {
            kind,
            timestamp: Utc::now(),
            data: sanitize(data),
            success,
        });
    }

    // ------------------------------------------------------------------
    // Timing
    // ------------------------------------------------------------------

    pub fn log_step_timing(&mut self, step: &str, duration: Duration) {
        self.record
            .timing
            .step_durations
            .insert(step.to_string(), duration.as_millis() as u64);
    }

    pub fn log_analysis_start(&mut self) {
        self.log_analysis_start_at(Utc::now());
    }

    pub fn log_analysis_start_at(&mut self, at: DateTime<Utc>) {
        self.record.timing.analysis_start = Some(at);
    }

    pub fn log_analysis_complete(&mut self, results: &Value) {
        self.log_analysis_complete_at(results, Utc::now());
    }

    /// Stores the analysis result and derives `totalDuration` from the
    /// analysis window when its start is known.
    pub fn log_analysis_complete_at(&mut self, results: &Value, at: DateTime<Utc>) {
        let timing = &mut self.record.timing;
        timing.analysis_complete = Some(at);
        if let Some(start) = timing.analysis_start {
            timing.total_duration = Some((at - start).num_milliseconds());
        }
        self.record.outputs.analysis_results = Some(sanitize(results));
    }

    pub fn log_performance_metric(&mut self, metric: &str, duration: Duration) {
        self.record
            .performance
            .load_times
            .insert(metric.to_string(), duration.as_millis() as u64);
    }

    pub fn log_memory_usage(&mut self, bytes: u64) {
        self.record.performance.memory_usage = Some(bytes);
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    pub fn log_recommendations(&mut self, recommendations: &[Value]) {
        self.record.outputs.recommendations = recommendations.iter().map(sanitize).collect();
    }

    pub fn log_generated_content(&mut self, content: &Value) {
        self.record.outputs.generated_content = Some(sanitize(content));
    }

    pub fn log_document_export(&mut self, kind: DocumentKind, filename: &str) {
        self.record.outputs.exported_documents.push(ExportedDocument {
            kind,
            filename: filename.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn log_follow_up_scheduled(&mut self, follow_up: &Value) {
        self.record.outputs.follow_up_scheduled = Some(sanitize(follow_up));
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    pub fn finalize(self) -> FinalizedRecord {
        self.finalize_at(Utc::now())
    }

    /// Closes timing and the last page view, then freezes the record.
    ///
    /// `totalDuration` keeps the analysis window when both analysis
    /// timestamps are set; otherwise it spans session start to `at`.
    pub fn finalize_at(mut self, at: DateTime<Utc>) -> FinalizedRecord {
        let timing = &mut self.record.timing;
        timing.session_end = Some(at);
        timing.total_duration = match (timing.analysis_start, timing.analysis_complete) {
            (Some(start), Some(complete)) => Some((complete - start).num_milliseconds()),
            _ => Some((at - timing.session_start).num_milliseconds()),
        };

        close_last_page_view(&mut self.record.interactions.page_views, at);

        tracing::debug!(
            session_id = %self.record.session_id,
            total_duration = ?self.record.timing.total_duration,
            "[Session] Finalized"
        );

        FinalizedRecord::from_record(self.record)
    }
}

fn close_last_page_view(page_views: &mut [PageView], at: DateTime<Utc>) {
    if let Some(last) = page_views.last_mut() {
        if last.duration.is_none() {
            last.duration = Some((at - last.timestamp).num_milliseconds().max(0));
        }
    }
}

/// Builds `session_{epochMillis}_{9 random alphanumerics}`.
fn generate_session_id(at: DateTime<Utc>) -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string()[..9].to_string();
    format!("session_{}_{}", at.timestamp_millis(), suffix)
}

/// A sanitized session log record that can no longer be mutated.
///
/// Produced by [`SessionContext::finalize`] and consumed by the fan-out
/// coordinator, so one record is persisted at most once.
#[derive(Debug)]
pub struct FinalizedRecord(SessionLogRecord);

impl FinalizedRecord {
    /// Freezes an already-built record (e.g. one loaded from disk).
    ///
    /// The record is sanitized on the way in.
    pub fn from_record(record: SessionLogRecord) -> Self {
        Self(record.sanitized())
    }

    pub fn session_id(&self) -> &str {
        &self.0.session_id
    }

    pub fn into_inner(self) -> SessionLogRecord {
        self.0
    }
}

impl Deref for FinalizedRecord {
    type Target = SessionLogRecord;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for FinalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn start() -> SessionContext {
        SessionContext::start_at(
            SessionStart {
                name: Some("Ada".to_string()),
                industry: Some("Technology".to_string()),
                form_submission: json!({"name": "Ada", "linkedin": "ada", "password": "x"}),
                ..Default::default()
            },
            t(0),
        )
    }

    #[test]
    fn test_session_id_format() {
        let ctx = start();
        let id = ctx.session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1], t(0).timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(start().session_id(), start().session_id());
    }

    #[test]
    fn test_blank_name_defaults_to_anonymous() {
        let ctx = SessionContext::start(SessionStart {
            name: Some("  ".to_string()),
            ..Default::default()
        });
        assert_eq!(ctx.record().user_info.name, "Anonymous");
    }

    #[test]
    fn test_form_submission_is_sanitized() {
        let ctx = start();
        assert_eq!(
            ctx.record().interactions.form_submission,
            json!({"name": "Ada", "linkedin": "ada"})
        );
    }

    #[test]
    fn test_start_logs_session_start_page_view() {
        let ctx = start();
        let views = &ctx.record().interactions.page_views;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].page, SESSION_START_PAGE);
        assert!(views[0].duration.is_none());
    }

    #[test]
    fn test_page_view_durations_close_previous_view() {
        let mut ctx = start();
        ctx.log_page_view_at("form", t(1_000));
        ctx.log_page_view_at("analysis", t(3_500));
        ctx.log_page_view_at("dashboard", t(3_500));

        let views = &ctx.record().interactions.page_views;
        let durations: Vec<Option<i64>> = views.iter().map(|v| v.duration).collect();
        assert_eq!(durations, vec![Some(1_000), Some(2_500), Some(0), None]);
    }

    #[test]
    fn test_first_n_minus_one_page_views_have_durations() {
        for n in 1..8 {
            let mut ctx = start();
            for i in 0..n {
                ctx.log_page_view_at(&format!("page-{i}"), t(100 * (i as i64 + 1)));
            }
            let views = &ctx.record().interactions.page_views;
            let closed = views.iter().filter(|v| v.duration.is_some()).count();
            assert_eq!(closed, views.len() - 1);
            assert!(views.last().unwrap().duration.is_none());
        }
    }

    #[test]
    fn test_total_duration_from_analysis_window() {
        let mut ctx = start();
        ctx.log_analysis_start_at(t(2_000));
        ctx.log_analysis_complete_at(&json!({"score": 72}), t(9_250));
        assert_eq!(ctx.record().timing.total_duration, Some(7_250));

        let record = ctx.finalize_at(t(60_000));
        assert_eq!(record.timing.total_duration, Some(7_250));
    }

    #[test]
    fn test_total_duration_zero_when_analysis_instant() {
        let mut ctx = start();
        ctx.log_analysis_start_at(t(5_000));
        ctx.log_analysis_complete_at(&json!({}), t(5_000));
        let record = ctx.finalize_at(t(6_000));
        assert_eq!(record.timing.total_duration, Some(0));
    }

    #[test]
    fn test_total_duration_falls_back_to_session_span() {
        let ctx = start();
        let record = ctx.finalize_at(t(42_000));
        assert_eq!(record.timing.total_duration, Some(42_000));
        assert_eq!(record.timing.session_end, Some(t(42_000)));
    }

    #[test]
    fn test_finalize_closes_last_page_view() {
        let mut ctx = start();
        ctx.log_page_view_at("dashboard", t(1_000));
        let record = ctx.finalize_at(t(4_000));
        assert!(record.interactions.page_views.iter().all(|v| v.duration.is_some()));
        assert_eq!(record.interactions.page_views[1].duration, Some(3_000));
    }

    #[test]
    fn test_counters_only_increase() {
        let mut ctx = start();
        ctx.warn("slow response");
        ctx.error("profile fetch failed");
        ctx.log_api_call("/api/analyze", "POST", Duration::from_millis(120), None);
        ctx.log_api_call(
            "/api/analyze",
            "POST",
            Duration::from_millis(80),
            Some("500".to_string()),
        );

        let perf = &ctx.record().performance;
        assert_eq!(perf.error_count, 2);
        assert_eq!(perf.warning_count, 1);
        assert_eq!(ctx.record().system_events.api_calls.len(), 2);
        assert!(!ctx.record().system_events.api_calls[1].success);
    }

    #[test]
    fn test_payloads_are_sanitized_on_entry() {
        let mut ctx = start();
        ctx.log_rag_update(
            RagUpdateKind::ProfileAnalysis,
            &json!({"profile": {"token": "t", "bio": "hi"}}),
            true,
        );
        ctx.log_interactive_answer("goal", json!({"text": "grow", "apiKey": "k"}));
        ctx.log_generated_content(&json!({"post": "hello", "secret": "s"}));

        let record = ctx.record();
        assert_eq!(
            record.system_events.rag_updates[0].data,
            json!({"profile": {"bio": "hi"}})
        );
        assert_eq!(
            record.interactions.interactive_answers["goal"].answer,
            json!({"text": "grow"})
        );
        assert_eq!(record.outputs.generated_content, Some(json!({"post": "hello"})));
    }

    #[test]
    fn test_additional_insights_merge() {
        let mut ctx = start();
        let mut first = Map::new();
        first.insert("tone".to_string(), json!("casual"));
        first.insert("goal".to_string(), json!("reach"));
        ctx.log_additional_insights(first);

        let mut second = Map::new();
        second.insert("goal".to_string(), json!("leads"));
        ctx.log_additional_insights(second);

        let insights = &ctx.record().interactions.additional_insights;
        assert_eq!(insights["tone"], json!("casual"));
        assert_eq!(insights["goal"], json!("leads"));
        assert!(insights.contains_key("timestamp"));
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let mut ctx = start();
        ctx.log_document_export(DocumentKind::Pdf, "report.pdf");
        let record = ctx.finalize_at(t(1_000));
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("sessionId").is_some());
        assert!(json["timing"].get("totalDuration").is_some());
        assert_eq!(json["outputs"]["exportedDocuments"][0]["type"], json!("pdf"));
        assert_eq!(json["outputs"]["analysisResults"], Value::Null);
        assert_eq!(json["performance"]["errorCount"], json!(0));
    }
}
