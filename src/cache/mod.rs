//! Cache Module
//!
//! Provides the bounded in-memory cache primitive with TTL expiration and
//! LRU eviction that both render-cache tiers are built on.

mod bounded;
mod entry;
mod lru;
mod stats;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::{hit_rate, CacheStats};
