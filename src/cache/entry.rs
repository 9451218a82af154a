//! Cache Entry Module
//!
//! Defines a single cached value together with its TTL and access bookkeeping.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was written (refreshed on overwrite)
    pub created_at: Instant,
    /// When the entry was last returned by a successful read
    pub last_accessed_at: Instant,
    /// Number of successful reads of this entry
    pub hit_count: u64,
    /// Time-to-live, None = never expires
    pub ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional time-to-live
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            last_accessed_at: now,
            hit_count: 0,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once strictly more than `ttl` has elapsed since it
    /// was created. Entries without a TTL never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.created_at) > ttl,
            None => false,
        }
    }

    // == Record Access ==
    /// Marks a successful read: bumps the hit count and access time.
    pub fn record_access(&mut self) {
        self.hit_count += 1;
        self.last_accessed_at = Instant::now();
    }
}
