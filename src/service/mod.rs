//! Render Cache Service Module
//!
//! The two-tier render cache, its latency tracking, health reporting and
//! administrative operations.

mod admin;
mod health;
mod latency;
mod render;

pub use admin::{WarmUpFailure, WarmUpReport, WarmUpRequest};
pub use health::{HealthReport, HealthStatus, MemoryUsage};
pub use latency::{LatencySummary, LatencyTracker};
pub use render::{output_key, CachePolicy, RenderCacheService, ServiceStats};
