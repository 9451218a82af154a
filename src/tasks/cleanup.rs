//! TTL Sweep Task
//!
//! Background task that periodically removes expired entries from both
//! render cache tiers, so entries nobody reads again do not pin memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::TemplateEngine;
use crate::service::RenderCacheService;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs until aborted, sleeping for `interval` between sweeps.
/// Each tier's lock is held only while that tier is scanned.
///
/// # Arguments
/// * `service` - Shared render cache service
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which should be aborted during
/// graceful shutdown.
///
/// # Example
/// ```ignore
/// let service = Arc::new(RenderCacheService::new(engine, CacheConfig::default()));
/// let sweeper = spawn_cleanup_task(service.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// sweeper.abort();
/// service.destroy().await;
/// ```
pub fn spawn_cleanup_task<E: TemplateEngine>(
    service: Arc<RenderCacheService<E>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            interval.as_secs_f64()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = service.sweep_expired().await;

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
