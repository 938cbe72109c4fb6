//! Shared helpers for the HTTP-backed sinks.

use brandlog_core::BrandlogError;
use serde::Deserialize;

/// Error body shape returned by the remote endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Builds an error from a non-success response, preferring the body's
/// `details` field, then `error`, then the status reason.
pub(crate) async fn error_from_response(response: reqwest::Response) -> BrandlogError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

    let message = body
        .details
        .or(body.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    BrandlogError::Remote {
        status: status.as_u16(),
        message,
    }
}

/// Maps a transport error, keeping timeouts distinguishable.
pub(crate) fn from_reqwest(
    err: reqwest::Error,
    operation: &str,
    timeout: Option<std::time::Duration>,
) -> BrandlogError {
    match timeout {
        Some(after) if err.is_timeout() => BrandlogError::timeout(operation, after),
        _ => BrandlogError::transport(format!("{}: {}", operation, err)),
    }
}

pub(crate) fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
