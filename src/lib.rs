//! Render Cache - A two-tier template render cache
//!
//! Caches compiled templates and rendered output in bounded, TTL-aware LRU
//! tiers, samples render latency per template, and exposes invalidation,
//! warm-up and health reporting over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::{CacheConfig, Config};
pub use engine::{FileTemplateEngine, TemplateEngine};
pub use error::CacheError;
pub use service::{CachePolicy, RenderCacheService};
pub use tasks::spawn_cleanup_task;
