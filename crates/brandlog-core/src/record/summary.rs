//! Summarized projection of a session log record.
//!
//! Carries identifying fields and counts only, never payloads. This is
//! what goes into the queryable `session_logs` collection.

use super::model::SessionLogRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogSummary {
    pub session_id: String,
    pub user_info: SummaryUserInfo,
    pub timing: SummaryTiming,
    pub interaction_counts: InteractionCounts,
    pub output_counts: OutputCounts,
    pub performance: SummaryPerformance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryUserInfo {
    pub name: String,
    pub industry: Option<String>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTiming {
    pub session_start: DateTime<Utc>,
    pub analysis_start: Option<DateTime<Utc>>,
    pub analysis_complete: Option<DateTime<Utc>>,
    pub total_duration: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionCounts {
    pub button_clicks: usize,
    pub page_views: usize,
    pub api_calls: usize,
    pub rag_updates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputCounts {
    pub recommendations: usize,
    pub exported_documents: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPerformance {
    pub error_count: u64,
    pub warning_count: u64,
}

impl From<&SessionLogRecord> for SessionLogSummary {
    fn from(record: &SessionLogRecord) -> Self {
        Self {
            session_id: record.session_id.clone(),
            user_info: SummaryUserInfo {
                name: record.user_info.name.clone(),
                industry: record.user_info.industry.clone(),
                ip_address: record.user_info.ip_address.clone(),
            },
            timing: SummaryTiming {
                session_start: record.timing.session_start,
                analysis_start: record.timing.analysis_start,
                analysis_complete: record.timing.analysis_complete,
                total_duration: record.timing.total_duration,
            },
            interaction_counts: InteractionCounts {
                button_clicks: record.interactions.button_clicks.len(),
                page_views: record.interactions.page_views.len(),
                api_calls: record.system_events.api_calls.len(),
                rag_updates: record.system_events.rag_updates.len(),
            },
            output_counts: OutputCounts {
                recommendations: record.outputs.recommendations.len(),
                exported_documents: record.outputs.exported_documents.len(),
            },
            performance: SummaryPerformance {
                error_count: record.performance.error_count,
                warning_count: record.performance.warning_count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SessionContext, SessionStart};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_summary_counts_without_payloads() {
        let mut ctx = SessionContext::start(SessionStart {
            name: Some("Grace".to_string()),
            industry: Some("Finance".to_string()),
            form_submission: json!({"bio": "a very long private bio"}),
            ..Default::default()
        });
        ctx.log_button_click("analyze", "submit-button");
        ctx.log_api_call("/api/analyze", "POST", Duration::from_millis(40), None);
        ctx.log_recommendations(&[json!({"title": "Post weekly"}), json!({"title": "Add headline"})]);
        let record = ctx.finalize();

        let summary = SessionLogSummary::from(&*record);
        assert_eq!(summary.session_id, record.session_id);
        assert_eq!(summary.interaction_counts.button_clicks, 1);
        assert_eq!(summary.interaction_counts.page_views, 1);
        assert_eq!(summary.interaction_counts.api_calls, 1);
        assert_eq!(summary.output_counts.recommendations, 2);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("private bio"));
        assert!(!json.contains("Post weekly"));
    }
}
