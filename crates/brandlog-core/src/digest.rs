//! Human-readable digest of a session log, sent through the notification channel.

use crate::record::SessionLogRecord;
use chrono::SecondsFormat;

/// Email subject line for a session digest.
pub fn subject(record: &SessionLogRecord) -> String {
    format!(
        "BrandAgent Session Log - {} - {}",
        record.user_info.name,
        record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Condensed markdown digest: ids, user info, timing, counts, output flags.
pub fn format_digest(record: &SessionLogRecord) -> String {
    let duration = format_duration(record.timing.total_duration);
    let user = &record.user_info;
    let location = user.location.as_ref();
    let url = location
        .map(|l| l.url.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown");
    let referrer = location
        .map(|l| l.referrer.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Direct");
    let outputs = &record.outputs;

    format!(
        "# BrandAgent Session Log

## Session Information
- **Session ID**: {session_id}
- **Timestamp**: {timestamp}
- **Duration**: {duration}

## User Information
- **Name**: {name}
- **Email**: {email}
- **Industry**: {industry}
- **IP Address**: {ip_address}
- **User Agent**: {user_agent}
- **URL**: {url}
- **Referrer**: {referrer}

## Performance Summary
- **Total Duration**: {duration}
- **Errors**: {errors}
- **Warnings**: {warnings}
- **API Calls**: {api_calls}
- **Button Clicks**: {button_clicks}
- **Page Views**: {page_views}

## Outputs Generated
- **Analysis Results**: {analysis_results}
- **Recommendations**: {recommendations}
- **Generated Content**: {generated_content}
- **Exported Documents**: {exported_documents}
- **Follow-up Scheduled**: {follow_up}

---
*Generated by BrandAgent Logging Service*",
        session_id = record.session_id,
        timestamp = record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        name = user.name,
        email = user.email.as_deref().unwrap_or("Not provided"),
        industry = user.industry.as_deref().unwrap_or("Unknown"),
        ip_address = user.ip_address.as_deref().unwrap_or("Unknown"),
        user_agent = user.user_agent.as_deref().unwrap_or("Unknown"),
        errors = record.performance.error_count,
        warnings = record.performance.warning_count,
        api_calls = record.system_events.api_calls.len(),
        button_clicks = record.interactions.button_clicks.len(),
        page_views = record.interactions.page_views.len(),
        analysis_results = flag(outputs.analysis_results.is_some()),
        recommendations = outputs.recommendations.len(),
        generated_content = flag(outputs.generated_content.is_some()),
        exported_documents = outputs.exported_documents.len(),
        follow_up = flag(outputs.follow_up_scheduled.is_some()),
    )
}

fn format_duration(total_ms: Option<i64>) -> String {
    match total_ms {
        Some(ms) if ms > 0 => format!("{}s", (ms as f64 / 1000.0).round() as i64),
        _ => "N/A".to_string(),
    }
}

fn flag(present: bool) -> &'static str {
    if present { "yes" } else { "no" }
}
