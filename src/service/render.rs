//! Render Cache Service
//!
//! Two cache tiers in front of a template engine: compiled artifacts keyed by
//! template path, and rendered output keyed by template path plus context
//! fingerprint. Render latency is sampled per template path.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{BoundedCache, CacheStats};
use crate::config::CacheConfig;
use crate::engine::{EngineError, TemplateEngine};
use crate::error::{CacheError, Result};
use crate::fingerprint::fingerprint;

use super::health::HealthReport;
use super::latency::{LatencySummary, LatencyTracker};

// == Cache Policy ==
/// How long a rendered page may be served from cache.
///
/// Callers pick the class matching how volatile the page is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// A single post or page; shortest TTL
    Detail,
    /// An index or listing page
    List,
    /// Rarely changing content; longest TTL
    Static,
    /// The output tier's default TTL
    #[default]
    Default,
    /// An explicit TTL
    #[serde(skip)]
    Custom(Duration),
}

impl CachePolicy {
    /// Resolves the policy to a concrete TTL.
    pub fn ttl(self, config: &CacheConfig) -> Duration {
        match self {
            CachePolicy::Detail => config.ttl_policy.detail,
            CachePolicy::List => config.ttl_policy.list,
            CachePolicy::Static => config.ttl_policy.static_page,
            CachePolicy::Default => config.outputs.default_ttl,
            CachePolicy::Custom(ttl) => ttl,
        }
    }
}

// == Service Stats ==
/// Aggregate statistics for both tiers and all sampled templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub enabled: bool,
    pub compiled_templates: CacheStats,
    pub rendered_output: CacheStats,
    /// Latency summary per template path
    pub render_times: BTreeMap<String, LatencySummary>,
    /// Failed renders per template path
    pub render_failures: BTreeMap<String, u64>,
}

// == Render Cache Service ==
/// Cache-aware compile and render wrappers around a [`TemplateEngine`].
///
/// Construct one per process, share it behind an `Arc`, and call
/// [`destroy`](Self::destroy) on shutdown.
pub struct RenderCacheService<E: TemplateEngine> {
    engine: Arc<E>,
    config: CacheConfig,
    enabled: AtomicBool,
    artifacts: RwLock<BoundedCache<Arc<E::Artifact>>>,
    outputs: RwLock<BoundedCache<String>>,
    latency: RwLock<LatencyTracker>,
}

/// Builds the rendered-output key for a template and context fingerprint.
pub fn output_key(template_path: &str, fingerprint: &str) -> String {
    format!("{}:{}", template_path, fingerprint)
}

/// The template path part of a rendered-output key.
pub(crate) fn output_template(key: &str) -> &str {
    key.rsplit_once(':').map_or(key, |(template_path, _)| template_path)
}

impl<E: TemplateEngine> RenderCacheService<E> {
    // == Constructor ==
    pub fn new(engine: E, config: CacheConfig) -> Self {
        Self {
            artifacts: RwLock::new(BoundedCache::new(
                config.artifacts.capacity,
                Some(config.artifacts.default_ttl),
            )),
            outputs: RwLock::new(BoundedCache::new(
                config.outputs.capacity,
                Some(config.outputs.default_ttl),
            )),
            latency: RwLock::new(LatencyTracker::new(
                config.latency_window,
                config.latency_max_templates,
            )),
            enabled: AtomicBool::new(config.enabled),
            engine: Arc::new(engine),
            config,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turns caching on or off. Stored entries are kept either way.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    // == Render ==
    /// Renders `template_path` with `context`, serving from the output tier
    /// when possible.
    ///
    /// On a miss the engine is invoked, its duration is sampled, and the
    /// output is stored with the TTL chosen by `policy`. Engine failures are
    /// returned unchanged in meaning, never cached, and never sampled.
    /// When the service is disabled every call goes to the engine.
    ///
    /// The output is only stored if caching is still enabled once the engine
    /// returns. An `invalidate` that runs while the engine is working does not
    /// stop the store, so that render's output can outlive the invalidation
    /// until its TTL runs out.
    pub async fn render(
        &self,
        template_path: &str,
        context: &Value,
        policy: CachePolicy,
    ) -> Result<String> {
        let fp = fingerprint(context);

        if !self.is_enabled() {
            let (output, elapsed) = self.produce(template_path, context, &fp).await?;
            self.record_render_time(template_path, elapsed).await;
            return Ok(output);
        }

        let key = output_key(template_path, &fp);
        let cached = self.outputs.write().await.get(&key);
        if let Some(output) = cached {
            debug!(template = template_path, fingerprint = %fp, "Rendered output cache hit");
            return Ok(output);
        }

        let (output, elapsed) = self.produce(template_path, context, &fp).await?;
        self.record_render_time(template_path, elapsed).await;
        if self.is_enabled() {
            self.outputs
                .write()
                .await
                .set(key, output.clone(), Some(policy.ttl(&self.config)));
        }
        Ok(output)
    }

    // == Get Or Compile ==
    /// Returns the compiled artifact for `template_path`, compiling and
    /// caching it on a miss.
    pub async fn get_or_compile(&self, template_path: &str) -> Result<Arc<E::Artifact>> {
        self.artifact(template_path)
            .await
            .map(|(artifact, _)| artifact)
    }

    /// Looks up or compiles an artifact, returning the time spent in the engine.
    async fn artifact(&self, template_path: &str) -> Result<(Arc<E::Artifact>, Duration)> {
        if let Some(artifact) = self.compiled(template_path).await {
            return Ok((artifact, Duration::ZERO));
        }

        let engine = Arc::clone(&self.engine);
        let path = template_path.to_string();
        let started = Instant::now();
        let compiled = tokio::task::spawn_blocking(move || engine.compile(&path))
            .await
            .map_err(EngineError::from)
            .and_then(|result| result)
            .map_err(|source| CacheError::Compile {
                template: template_path.to_string(),
                source,
            })?;
        let elapsed = started.elapsed();

        let artifact = Arc::new(compiled);
        if self.is_enabled() {
            self.artifacts
                .write()
                .await
                .set(template_path, Arc::clone(&artifact), None);
        }
        Ok((artifact, elapsed))
    }

    /// Compiles (or fetches) and renders, timing only the engine calls.
    async fn produce(
        &self,
        template_path: &str,
        context: &Value,
        fp: &str,
    ) -> Result<(String, Duration)> {
        let result = match self.artifact(template_path).await {
            Ok((artifact, compile_time)) => {
                let engine = Arc::clone(&self.engine);
                let context = context.clone();
                let started = Instant::now();
                tokio::task::spawn_blocking(move || engine.render(&artifact, &context))
                    .await
                    .map_err(EngineError::from)
                    .and_then(|result| result)
                    .map(|output| (output, compile_time + started.elapsed()))
                    .map_err(|source| CacheError::Render {
                        template: template_path.to_string(),
                        fingerprint: fp.to_string(),
                        source,
                    })
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            if let Some(EngineError::TemplateNotFound(_)) = e.engine_error() {
                // Unknown paths come straight from callers; they are not tracked
                debug!(template = template_path, "Template not found");
            } else {
                warn!(template = template_path, fingerprint = %fp, error = %e, "Template render failed");
                self.latency.write().await.record_failure(template_path);
            }
        }
        result
    }

    // == Tier Accessors ==
    /// Cached compiled artifact, if present. Always None when disabled.
    pub async fn compiled(&self, template_path: &str) -> Option<Arc<E::Artifact>> {
        if !self.is_enabled() {
            return None;
        }
        self.artifacts.write().await.get(template_path)
    }

    /// Stores a compiled artifact under its template path. No-op when disabled.
    pub async fn store_compiled(&self, template_path: &str, artifact: E::Artifact) {
        if !self.is_enabled() {
            return;
        }
        self.artifacts
            .write()
            .await
            .set(template_path, Arc::new(artifact), None);
    }

    /// Cached rendered output, if present. Always None when disabled.
    pub async fn rendered(&self, template_path: &str, fingerprint: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        self.outputs
            .write()
            .await
            .get(&output_key(template_path, fingerprint))
    }

    /// Stores rendered output. `ttl` of None uses the output tier default.
    /// No-op when disabled.
    pub async fn store_rendered(
        &self,
        template_path: &str,
        fingerprint: &str,
        output: String,
        ttl: Option<Duration>,
    ) {
        if !self.is_enabled() {
            return;
        }
        self.outputs
            .write()
            .await
            .set(output_key(template_path, fingerprint), output, ttl);
    }

    // == Latency ==
    /// Adds a render-time sample for `template_path`.
    pub async fn record_render_time(&self, template_path: &str, elapsed: Duration) {
        self.latency.write().await.record(template_path, elapsed);
    }

    // == Stats ==
    pub async fn stats(&self) -> ServiceStats {
        let compiled_templates = self.artifacts.read().await.stats();
        let rendered_output = self.outputs.read().await.stats();
        let latency = self.latency.read().await;

        ServiceStats {
            enabled: self.is_enabled(),
            compiled_templates,
            rendered_output,
            render_times: latency.summaries(),
            render_failures: latency.failures(),
        }
    }

    // == Health ==
    pub async fn health(&self) -> HealthReport {
        let compiled = self.artifacts.read().await.stats();
        let rendered = self.outputs.read().await.stats();
        HealthReport::evaluate(self.is_enabled(), compiled, rendered, &self.config.health)
    }

    // == Sweep ==
    /// Removes expired entries from both tiers. Returns the number removed.
    ///
    /// Each tier is locked only while it is scanned.
    pub async fn sweep_expired(&self) -> usize {
        let artifacts = self.artifacts.write().await.cleanup_expired();
        let outputs = self.outputs.write().await.cleanup_expired();
        artifacts + outputs
    }

    pub(super) fn artifact_tier(&self) -> &RwLock<BoundedCache<Arc<E::Artifact>>> {
        &self.artifacts
    }

    pub(super) fn output_tier(&self) -> &RwLock<BoundedCache<String>> {
        &self.outputs
    }

    pub(super) fn latency(&self) -> &RwLock<LatencyTracker> {
        &self.latency
    }
}
