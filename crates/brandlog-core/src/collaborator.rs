//! Narrow interfaces to the external collaborators an analysis uses.
//!
//! Providers live outside this workspace; only the contracts are defined here.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// LLM text/object generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates free text (returned as a JSON string) or, when `schema`
    /// is given, a structured object matching it.
    ///
    /// # Errors
    ///
    /// Returns the provider error; callers substitute a fallback payload.
    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<Value>;
}

/// Web-scraping/search provider.
#[async_trait]
pub trait ProfileScraper: Send + Sync {
    /// Returns profile data, or `None` on any failure. Never errors.
    async fn scrape(&self, url: &str) -> Option<Value>;
}
