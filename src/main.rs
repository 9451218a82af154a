//! Render Cache - A two-tier template render cache server
//!
//! Serves templates from a directory through the render cache and exposes the
//! cache administration endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use render_cache::api::create_router;
use render_cache::service::RenderCacheService;
use render_cache::{spawn_cleanup_task, AppState, Config, FileTemplateEngine};

/// Main entry point for the render cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the template engine and render cache service
/// 4. Start background TTL sweep task
/// 5. Warm up the configured seed templates
/// 6. Create Axum router and serve on the configured port
/// 7. On SIGINT/SIGTERM, stop the sweeper and destroy the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "render_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Render Cache Server");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        template_dir = %config.template_dir.display(),
        enabled = config.cache.enabled,
        artifact_capacity = config.cache.artifacts.capacity,
        output_capacity = config.cache.outputs.capacity,
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        "Configuration loaded"
    );

    let engine = FileTemplateEngine::new(&config.template_dir);
    let state = AppState::from_config(engine, &config);
    let service = Arc::clone(&state.service);
    info!("Render cache initialized");

    let cleanup_handle = spawn_cleanup_task(Arc::clone(&service), config.cleanup_interval);
    info!("Background sweep task started");

    if !state.warmup.is_empty() {
        let report = service.warm_up(&state.warmup).await;
        info!(
            rendered = report.rendered,
            failed = report.failed.len(),
            "Startup warm-up complete"
        );
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle, service))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown, aborts the sweep task and drops all cached state.
async fn shutdown_signal(
    cleanup_handle: tokio::task::JoinHandle<()>,
    service: Arc<RenderCacheService<FileTemplateEngine>>,
) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Sweep task aborted");
    service.destroy().await;
}
