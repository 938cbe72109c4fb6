//! Aggregate statistics over stored session logs.

use crate::record::{DocumentKind, SessionLogRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_sessions: usize,
    /// Percentage of sessions with analysis results and a completion time
    pub completion_rate: f64,
    /// Mean `totalDuration` in milliseconds over sessions that have one
    pub average_session_duration: f64,
    pub popular_industries: Vec<IndustryCount>,
    pub common_issues: Vec<IssueFrequency>,
    pub export_stats: ExportStats,
    pub follow_up_stats: FollowUpStats,
    pub performance_metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryCount {
    pub industry: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFrequency {
    pub issue: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_exports: usize,
    pub pdf_exports: usize,
    pub word_exports: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpStats {
    pub scheduled: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub average_load_time: f64,
    pub error_rate: f64,
    pub api_success_rate: f64,
}

impl AnalyticsSummary {
    pub fn from_records(records: &[SessionLogRecord]) -> Self {
        Self {
            total_sessions: records.len(),
            completion_rate: completion_rate(records),
            average_session_duration: average_duration(records),
            popular_industries: popular_industries(records),
            common_issues: common_issues(records),
            export_stats: export_stats(records),
            follow_up_stats: FollowUpStats {
                scheduled: records
                    .iter()
                    .filter(|r| r.outputs.follow_up_scheduled.is_some())
                    .count(),
            },
            performance_metrics: performance_metrics(records),
        }
    }
}

/// Case-insensitive match on user name, industry or session id.
pub fn matches_search(record: &SessionLogRecord, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }
    record.user_info.name.to_lowercase().contains(&term)
        || record
            .user_info
            .industry
            .as_deref()
            .is_some_and(|i| i.to_lowercase().contains(&term))
        || record.session_id.to_lowercase().contains(&term)
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn completion_rate(records: &[SessionLogRecord]) -> f64 {
    let completed = records.iter().filter(|r| r.is_completed()).count();
    percentage(completed, records.len())
}

fn average_duration(records: &[SessionLogRecord]) -> f64 {
    let durations: Vec<i64> = records
        .iter()
        .filter_map(|r| r.timing.total_duration)
        .filter(|d| *d > 0)
        .collect();
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<i64>() as f64 / durations.len() as f64
}

/// Sorts by count descending, then name, and keeps the top entries.
fn top_counts(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_N);
    entries
}

fn popular_industries(records: &[SessionLogRecord]) -> Vec<IndustryCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let industry = record
            .user_info
            .industry
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        *counts.entry(industry).or_default() += 1;
    }
    top_counts(counts)
        .into_iter()
        .map(|(industry, count)| IndustryCount { industry, count })
        .collect()
}

fn common_issues(records: &[SessionLogRecord]) -> Vec<IssueFrequency> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for call in records
        .iter()
        .flat_map(|r| r.system_events.api_calls.iter())
        .filter(|c| !c.success)
    {
        let issue = call
            .error
            .clone()
            .unwrap_or_else(|| "Unknown API Error".to_string());
        *counts.entry(issue).or_default() += 1;
    }
    top_counts(counts)
        .into_iter()
        .map(|(issue, frequency)| IssueFrequency { issue, frequency })
        .collect()
}

fn export_stats(records: &[SessionLogRecord]) -> ExportStats {
    let mut stats = ExportStats::default();
    for doc in records.iter().flat_map(|r| r.outputs.exported_documents.iter()) {
        stats.total_exports += 1;
        match doc.kind {
            DocumentKind::Pdf => stats.pdf_exports += 1,
            DocumentKind::Word => stats.word_exports += 1,
        }
    }
    stats
}

fn performance_metrics(records: &[SessionLogRecord]) -> PerformanceMetrics {
    let load_times: Vec<u64> = records
        .iter()
        .flat_map(|r| r.performance.load_times.values().copied())
        .collect();
    let average_load_time = if load_times.is_empty() {
        0.0
    } else {
        load_times.iter().sum::<u64>() as f64 / load_times.len() as f64
    };

    let calls: Vec<bool> = records
        .iter()
        .flat_map(|r| r.system_events.api_calls.iter().map(|c| c.success))
        .collect();
    let failed = calls.iter().filter(|ok| !**ok).count();

    PerformanceMetrics {
        average_load_time,
        error_rate: percentage(failed, calls.len()),
        api_success_rate: if calls.is_empty() {
            100.0
        } else {
            percentage(calls.len() - failed, calls.len())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SessionContext, SessionStart};
    use serde_json::json;
    use std::time::Duration;

    fn session(name: &str, industry: Option<&str>) -> SessionContext {
        SessionContext::start(SessionStart {
            name: Some(name.to_string()),
            industry: industry.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_summary() {
        let summary = AnalyticsSummary::from_records(&[]);
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.completion_rate, 0.0);
        assert_eq!(summary.performance_metrics.api_success_rate, 100.0);
        assert!(summary.popular_industries.is_empty());
    }

    #[test]
    fn test_summary_over_sessions() {
        let mut a = session("Ada", Some("Technology"));
        a.log_analysis_start();
        a.log_analysis_complete(&json!({"score": 70}));
        a.log_api_call("/api/analyze", "POST", Duration::from_millis(10), None);
        a.log_api_call(
            "/api/analyze",
            "POST",
            Duration::from_millis(10),
            Some("rate limited".to_string()),
        );
        a.log_document_export(DocumentKind::Pdf, "a.pdf");
        a.log_performance_metric("dashboard", Duration::from_millis(300));

        let mut b = session("Grace", Some("Technology"));
        b.log_document_export(DocumentKind::Word, "b.docx");
        b.log_follow_up_scheduled(&json!({"date": "2026-11-01"}));
        b.log_performance_metric("dashboard", Duration::from_millis(100));

        let c = session("Linus", None);

        let records = vec![
            a.finalize().into_inner(),
            b.finalize().into_inner(),
            c.finalize().into_inner(),
        ];
        let summary = AnalyticsSummary::from_records(&records);

        assert_eq!(summary.total_sessions, 3);
        assert!((summary.completion_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            summary.popular_industries[0],
            IndustryCount {
                industry: "Technology".to_string(),
                count: 2
            }
        );
        assert_eq!(summary.popular_industries[1].industry, "Unknown");
        assert_eq!(
            summary.common_issues,
            vec![IssueFrequency {
                issue: "rate limited".to_string(),
                frequency: 1
            }]
        );
        assert_eq!(summary.export_stats.total_exports, 2);
        assert_eq!(summary.export_stats.pdf_exports, 1);
        assert_eq!(summary.follow_up_stats.scheduled, 1);
        assert_eq!(summary.performance_metrics.average_load_time, 200.0);
        assert_eq!(summary.performance_metrics.error_rate, 50.0);
        assert_eq!(summary.performance_metrics.api_success_rate, 50.0);
    }

    #[test]
    fn test_matches_search() {
        let record = session("Ada Lovelace", Some("Technology")).finalize();
        assert!(matches_search(&record, "ada"));
        assert!(matches_search(&record, "TECH"));
        assert!(matches_search(&record, &record.session_id[..12]));
        assert!(matches_search(&record, ""));
        assert!(!matches_search(&record, "finance"));
    }
}
