//! API Routes
//!
//! Configures the Axum router with all render cache endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_action_handler, cache_delete_handler, cache_info_handler, health_handler,
    render_handler, AppState,
};
use crate::engine::TemplateEngine;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache` - Cache stats and health (`?action=stats|health`)
/// - `POST /cache` - Invalidate or warm up (`{"action": ...}`)
/// - `DELETE /cache` - Invalidate one template (`?template=`) or all
/// - `POST /render` - Render a template through the cache
/// - `GET /health` - Liveness check
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router<E: TemplateEngine>(state: AppState<E>) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/cache",
            get(cache_info_handler::<E>)
                .post(cache_action_handler::<E>)
                .delete(cache_delete_handler::<E>),
        )
        .route("/render", post(render_handler::<E>))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
