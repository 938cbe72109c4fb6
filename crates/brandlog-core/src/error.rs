//! Error types for brandlog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire brandlog workspace.
///
/// Typed, structured variants with automatic conversion from the
/// storage and serialization errors the lower layers produce.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum BrandlogError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A sink or service has no configuration and was skipped
    #[error("{0} not configured")]
    NotConfigured(String),

    /// A stored value would exceed the local storage quota
    #[error("Quota exceeded for '{key}': {size} bytes (limit {limit})")]
    QuotaExceeded { key: String, size: u64, limit: u64 },

    /// File lock could not be acquired
    #[error("Lock error: {0}")]
    Lock(String),

    /// Network/transport error talking to a remote endpoint
    #[error("Transport error: {0}")]
    Transport(String),

    /// Remote endpoint answered with a non-success status
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Request exceeded its deadline
    #[error("{operation} timed out after {seconds:.1}s")]
    Timeout { operation: String, seconds: f64 },
}

impl BrandlogError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a NotConfigured error for the named component
    pub fn not_configured(component: impl Into<String>) -> Self {
        Self::NotConfigured(component.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Timeout error
    pub fn timeout(operation: impl Into<String>, after: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds: after.as_secs_f64(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotConfigured error
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured(_))
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this is a quota error
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BrandlogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BrandlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BrandlogError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, BrandlogError>`.
pub type Result<T> = std::result::Result<T, BrandlogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_not_configured_message() {
        let err = BrandlogError::not_configured("remote document store");
        assert_eq!(err.to_string(), "remote document store not configured");
        assert!(err.is_not_configured());
    }

    #[test]
    fn test_timeout_message() {
        let err = BrandlogError::timeout("notification request", Duration::from_secs(10));
        assert_eq!(err.to_string(), "notification request timed out after 10.0s");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BrandlogError = parse_err.into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }
}
