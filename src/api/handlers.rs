//! API Handlers
//!
//! HTTP request handlers for the render cache endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::engine::TemplateEngine;
use crate::error::{CacheError, Result};
use crate::models::{
    ActionResponse, CacheAction, CacheActionRequest, CacheOverview, CacheQuery, DataResponse,
    HealthResponse, InvalidateQuery, RenderRequest,
};
use crate::service::{RenderCacheService, WarmUpRequest};

/// Application state shared across all handlers.
pub struct AppState<E: TemplateEngine> {
    /// The process-wide render cache
    pub service: Arc<RenderCacheService<E>>,
    /// Seed requests used by the warm-up action
    pub warmup: Arc<Vec<WarmUpRequest>>,
}

impl<E: TemplateEngine> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            warmup: Arc::clone(&self.warmup),
        }
    }
}

impl<E: TemplateEngine> AppState<E> {
    /// Creates a new AppState around an existing service.
    pub fn new(service: Arc<RenderCacheService<E>>, warmup: Vec<WarmUpRequest>) -> Self {
        Self {
            service,
            warmup: Arc::new(warmup),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the service with the configured tiers and turns
    /// `warmup_templates` into empty-context seed requests.
    pub fn from_config(engine: E, config: &Config) -> Self {
        let service = RenderCacheService::new(engine, config.cache.clone());
        let warmup = config
            .warmup_templates
            .iter()
            .map(WarmUpRequest::new)
            .collect();
        Self::new(Arc::new(service), warmup)
    }
}

/// Handler for GET /cache
///
/// `?action=stats` or `?action=health` returns one report; anything else
/// returns both.
pub async fn cache_info_handler<E: TemplateEngine>(
    State(state): State<AppState<E>>,
    Query(query): Query<CacheQuery>,
) -> Response {
    match query.action.as_deref() {
        Some("stats") => Json(DataResponse::new(state.service.stats().await)).into_response(),
        Some("health") => Json(DataResponse::new(state.service.health().await)).into_response(),
        _ => {
            let overview = CacheOverview {
                stats: state.service.stats().await,
                health: state.service.health().await,
            };
            Json(DataResponse::new(overview)).into_response()
        }
    }
}

/// Handler for POST /cache
///
/// Runs an `invalidate` (one template or all) or `warmup` action.
pub async fn cache_action_handler<E: TemplateEngine>(
    State(state): State<AppState<E>>,
    Json(req): Json<CacheActionRequest>,
) -> Result<Json<ActionResponse>> {
    let response = match req.action()? {
        CacheAction::Invalidate => invalidate(&state, req.template_path()).await,
        CacheAction::WarmUp => {
            info!(seeds = state.warmup.len(), "Cache warm-up requested");
            let report = state.service.warm_up(&state.warmup).await;
            ActionResponse::warmed_up(report)
        }
    };
    Ok(Json(response))
}

/// Handler for DELETE /cache
///
/// `?template=<path>` invalidates one template; without it everything is cleared.
pub async fn cache_delete_handler<E: TemplateEngine>(
    State(state): State<AppState<E>>,
    Query(query): Query<InvalidateQuery>,
) -> Json<ActionResponse> {
    Json(invalidate(&state, query.template()).await)
}

async fn invalidate<E: TemplateEngine>(state: &AppState<E>, template: Option<&str>) -> ActionResponse {
    match template {
        Some(template) => {
            let removed = state.service.invalidate(template).await;
            ActionResponse::invalidated(template, removed)
        }
        None => {
            state.service.invalidate_all().await;
            ActionResponse::invalidated_all()
        }
    }
}

/// Handler for POST /render
///
/// Renders a template through the cache and returns the HTML.
pub async fn render_handler<E: TemplateEngine>(
    State(state): State<AppState<E>>,
    Json(req): Json<RenderRequest>,
) -> Result<Html<String>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let output = state
        .service
        .render(&req.template_path, &req.context, req.effective_policy())
        .await?;
    Ok(Html(output))
}

/// Handler for GET /health
///
/// Liveness check; cache health is served by `GET /cache?action=health`.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
