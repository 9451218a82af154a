//! Cache Administration
//!
//! Invalidation and warm-up operations backing the admin endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::engine::TemplateEngine;

use super::render::{output_template, CachePolicy, RenderCacheService};

// == Warm-Up Request ==
/// A template and context to pre-render during warm-up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmUpRequest {
    pub template_path: String,
    #[serde(default = "empty_context")]
    pub context: Value,
    #[serde(default)]
    pub policy: CachePolicy,
}

fn empty_context() -> Value {
    json!({})
}

impl WarmUpRequest {
    /// Warm-up request with an empty context and the default policy.
    pub fn new(template_path: impl Into<String>) -> Self {
        Self {
            template_path: template_path.into(),
            context: empty_context(),
            policy: CachePolicy::Default,
        }
    }
}

// == Warm-Up Report ==
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmUpFailure {
    pub template_path: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WarmUpReport {
    /// Requests that rendered (or were already cached)
    pub rendered: usize,
    pub failed: Vec<WarmUpFailure>,
}

impl<E: TemplateEngine> RenderCacheService<E> {
    // == Invalidate ==
    /// Removes every entry in both tiers whose template path contains
    /// `template_path`, along with those templates' latency and failure
    /// bookkeeping. Output keys are matched on their template part only,
    /// never on the context fingerprint.
    ///
    /// Returns the number of cache entries removed.
    pub async fn invalidate(&self, template_path: &str) -> usize {
        let matches = |path: &str| path.contains(template_path);

        let artifacts = self
            .artifact_tier()
            .write()
            .await
            .delete_where(|key, _| matches(key));
        let outputs = self
            .output_tier()
            .write()
            .await
            .delete_where(|key, _| matches(output_template(key)));
        self.latency().write().await.forget_where(matches);

        let removed = artifacts + outputs;
        info!(
            template = template_path,
            artifacts, outputs, "Invalidated template cache entries"
        );
        removed
    }

    // == Invalidate All ==
    /// Clears both tiers, their counters and all latency samples.
    pub async fn invalidate_all(&self) {
        self.artifact_tier().write().await.clear();
        self.output_tier().write().await.clear();
        self.latency().write().await.clear();
        info!("Invalidated all template caches");
    }

    // == Warm Up ==
    /// Renders each seed request in order, caching the results.
    ///
    /// Failures are logged and collected; they never stop the remaining seeds.
    pub async fn warm_up(&self, seeds: &[WarmUpRequest]) -> WarmUpReport {
        let mut report = WarmUpReport::default();

        for seed in seeds {
            match self
                .render(&seed.template_path, &seed.context, seed.policy)
                .await
            {
                Ok(_) => report.rendered += 1,
                Err(e) => {
                    warn!(template = %seed.template_path, error = %e, "Warm-up render failed");
                    report.failed.push(WarmUpFailure {
                        template_path: seed.template_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            rendered = report.rendered,
            failed = report.failed.len(),
            "Cache warm-up finished"
        );
        report
    }

    // == Destroy ==
    /// Drops all cached state. Call once at shutdown, after stopping the sweeper.
    pub async fn destroy(&self) {
        self.invalidate_all().await;
    }
}
