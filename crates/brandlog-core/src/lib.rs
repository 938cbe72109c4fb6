//! Domain layer for brandlog: session log records, sanitization, and the
//! contracts the fan-out coordinator drives.

pub mod analytics;
pub mod collaborator;
pub mod config;
pub mod digest;
pub mod error;
pub mod failure;
pub mod persist;
pub mod record;
pub mod sanitize;
pub mod sink;

// Re-export common error type
pub use error::BrandlogError;
