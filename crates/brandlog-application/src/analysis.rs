//! Analysis steps backed by external collaborators.
//!
//! A step always yields a result: provider failures are logged on the
//! session and replaced by the caller's static fallback payload.

use brandlog_core::collaborator::{ProfileScraper, TextGenerator};
use brandlog_core::record::{ExternalService, SessionContext};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Step name of the main brand analysis.
pub const ANALYSIS_STEP: &str = "analyze";

pub struct AnalysisStep {
    generator: Arc<dyn TextGenerator>,
    scraper: Option<Arc<dyn ProfileScraper>>,
}

impl AnalysisStep {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            scraper: None,
        }
    }

    pub fn with_scraper(mut self, scraper: Arc<dyn ProfileScraper>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    /// Runs one generation step, falling back to `fallback` on error.
    ///
    /// The step itself is logged as a successful API call either way; a
    /// provider failure shows up as a failed `openai` service call plus a
    /// warning.
    pub async fn run(
        &self,
        ctx: &mut SessionContext,
        step: &str,
        prompt: &str,
        schema: Option<&Value>,
        fallback: Value,
    ) -> Value {
        let started = Instant::now();
        let generated = self.generator.generate(prompt, schema).await;
        let elapsed = started.elapsed();

        let result = match generated {
            Ok(value) => {
                ctx.log_external_service(ExternalService::Openai, step, None);
                value
            }
            Err(e) => {
                ctx.log_external_service(ExternalService::Openai, step, Some(e.to_string()));
                ctx.warn(&format!("[Analysis] {} failed, using fallback: {}", step, e));
                fallback
            }
        };

        ctx.log_api_call(&format!("/api/{}", step), "POST", elapsed, None);
        ctx.log_step_timing(step, elapsed);
        result
    }

    /// Runs the main analysis and records its window on the session.
    pub async fn analyze(
        &self,
        ctx: &mut SessionContext,
        prompt: &str,
        schema: Option<&Value>,
        fallback: Value,
    ) -> Value {
        ctx.log_analysis_start();
        let result = self.run(ctx, ANALYSIS_STEP, prompt, schema, fallback).await;
        ctx.log_analysis_complete(&result);
        result
    }

    /// Scrapes a profile page. `None` passes straight through.
    pub async fn scrape_profile(&self, ctx: &mut SessionContext, url: &str) -> Option<Value> {
        let Some(scraper) = &self.scraper else {
            ctx.log_external_service(
                ExternalService::Exa,
                "scrape_profile",
                Some("profile scraper not configured".to_string()),
            );
            return None;
        };

        let profile = scraper.scrape(url).await;
        let error = profile
            .is_none()
            .then(|| format!("no profile data for {}", url));
        ctx.log_external_service(ExternalService::Exa, "scrape_profile", error);
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brandlog_core::record::SessionStart;
    use serde_json::json;

    struct FixedGenerator(Value);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str, _schema: Option<&Value>) -> anyhow::Result<Value> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _schema: Option<&Value>) -> anyhow::Result<Value> {
            anyhow::bail!("rate limited")
        }
    }

    struct FixedScraper(Option<Value>);

    #[async_trait]
    impl ProfileScraper for FixedScraper {
        async fn scrape(&self, _url: &str) -> Option<Value> {
            self.0.clone()
        }
    }

    fn ctx() -> SessionContext {
        SessionContext::start(SessionStart::default())
    }

    #[tokio::test]
    async fn test_success_returns_generated_value() {
        let step = AnalysisStep::new(Arc::new(FixedGenerator(json!({"score": 8}))));
        let mut ctx = ctx();

        let result = step
            .analyze(&mut ctx, "analyze Acme", None, json!({"score": 0}))
            .await;

        assert_eq!(result, json!({"score": 8}));
        let record = ctx.record();
        assert_eq!(record.outputs.analysis_results, Some(json!({"score": 8})));
        assert!(record.timing.analysis_start.is_some());
        assert!(record.timing.analysis_complete.is_some());
        assert_eq!(record.performance.warning_count, 0);

        let service = &record.system_events.external_services[0];
        assert_eq!(service.service, ExternalService::Openai);
        assert!(service.success);
        assert_eq!(record.system_events.api_calls[0].endpoint, "/api/analyze");
        assert!(record.timing.step_durations.contains_key("analyze"));
    }

    #[tokio::test]
    async fn test_failure_uses_fallback_and_warns() {
        let step = AnalysisStep::new(Arc::new(FailingGenerator));
        let mut ctx = ctx();

        let result = step
            .run(&mut ctx, "recommendations", "p", None, json!(["static advice"]))
            .await;

        assert_eq!(result, json!(["static advice"]));
        let record = ctx.record();
        assert_eq!(record.performance.warning_count, 1);
        assert_eq!(record.performance.error_count, 0);

        let service = &record.system_events.external_services[0];
        assert!(!service.success);
        assert_eq!(service.error.as_deref(), Some("rate limited"));
        assert!(record.system_events.api_calls[0].success);
    }

    #[tokio::test]
    async fn test_scrape_profile_passes_none_through() {
        let step = AnalysisStep::new(Arc::new(FailingGenerator))
            .with_scraper(Arc::new(FixedScraper(None)));
        let mut ctx = ctx();

        assert!(step.scrape_profile(&mut ctx, "https://acme.example").await.is_none());

        let service = &ctx.record().system_events.external_services[0];
        assert_eq!(service.service, ExternalService::Exa);
        assert!(!service.success);
    }

    #[tokio::test]
    async fn test_scrape_profile_returns_data() {
        let step = AnalysisStep::new(Arc::new(FailingGenerator))
            .with_scraper(Arc::new(FixedScraper(Some(json!({"title": "Acme"})))));
        let mut ctx = ctx();

        let profile = step.scrape_profile(&mut ctx, "https://acme.example").await;

        assert_eq!(profile, Some(json!({"title": "Acme"})));
        assert!(ctx.record().system_events.external_services[0].success);
    }
}
