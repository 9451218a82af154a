//! Bounded Cache Module
//!
//! Fixed-capacity key/value store combining HashMap storage with LRU tracking
//! and per-entry TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Bounded Cache ==
/// Fixed-capacity cache with LRU eviction and TTL support.
///
/// A capacity of zero yields a cache that never stores anything: every
/// `set` is dropped and every `get` is a miss.
#[derive(Debug)]
pub struct BoundedCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Lifetime hit/miss/eviction counters
    counters: Counters,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied when `set` is called without one
    default_ttl: Option<Duration>,
}

impl<V> BoundedCache<V> {
    // == Constructor ==
    /// Creates a new cache with the given capacity and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of live entries
    /// * `default_ttl` - TTL for entries stored without an explicit one (None = no expiry)
    pub fn new(capacity: usize, default_ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: Counters::default(),
            capacity,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry for `key`.
    ///
    /// Overwriting resets the entry's creation time, TTL and hit count.
    /// If the key is new and the cache is full, the least recently used
    /// entry is evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        if self.capacity == 0 {
            return;
        }

        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        while !is_overwrite && self.entries.len() >= self.capacity {
            let Some(evicted_key) = self.lru.evict_oldest() else {
                break;
            };
            self.entries.remove(&evicted_key);
            self.counters.record_eviction();
        }

        let entry = CacheEntry::new(value, ttl.or(self.default_ttl));
        self.lru.touch(&key);
        self.entries.insert(key, entry);
    }

    // == Has ==
    /// Returns true if `key` holds a live entry.
    ///
    /// Expired entries are removed, but access bookkeeping and the
    /// hit/miss counters are left untouched.
    pub fn has(&mut self, key: &str) -> bool {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return false,
        };

        if expired {
            self.remove_entry(key);
        }
        !expired
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Delete Where ==
    /// Removes every entry whose key and value satisfy `predicate`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&str, &V) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| predicate(key, &entry.value))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }

    // == Clear ==
    /// Removes all entries and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.counters.reset();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed. Counters are unaffected.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        self.delete_where_entry(|entry| entry.is_expired_at(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats::snapshot(self.counters, self.entries.len(), self.capacity)
    }

    /// Returns the metadata of a live entry without touching it.
    pub fn peek_entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.lru.remove(key);
        }
        removed
    }

    fn delete_where_entry<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&CacheEntry<V>) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| predicate(entry))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }
}

impl<V: Clone> BoundedCache<V> {
    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None on a miss. Expired entries are removed and counted as
    /// misses. A hit refreshes the entry's LRU position and access metadata.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.counters.record_miss();
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.record_access();
        let value = entry.value.clone();
        self.lru.touch(key);
        self.counters.record_hit();
        Some(value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const HOUR: Option<Duration> = Some(Duration::from_secs(3600));

    fn cache(capacity: usize) -> BoundedCache<String> {
        BoundedCache::new(capacity, HOUR)
    }

    #[test]
    fn test_cache_new() {
        let cache = cache(100);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 100);
        assert_eq!(cache.default_ttl(), HOUR);
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = cache(100);

        cache.set("key1", "value1".to_string(), None);

        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_nonexistent_is_miss() {
        let mut cache = cache(100);

        assert_eq!(cache.get("nonexistent"), None);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_get_updates_access_metadata() {
        let mut cache = cache(100);
        cache.set("key1", "value1".to_string(), None);

        cache.get("key1");
        cache.get("key1");

        let entry = cache.peek_entry("key1").unwrap();
        assert_eq!(entry.hit_count, 2);
        assert!(entry.last_accessed_at >= entry.created_at);
    }

    #[test]
    fn test_delete() {
        let mut cache = cache(100);

        cache.set("key1", "value1".to_string(), None);

        assert!(cache.delete("key1"));
        assert!(!cache.delete("key1"));
        assert!(cache.is_empty());
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_overwrite_resets_entry() {
        let mut cache = cache(100);

        cache.set("key1", "value1".to_string(), None);
        cache.get("key1");
        cache.set("key1", "value2".to_string(), Some(Duration::from_secs(5)));

        let entry = cache.peek_entry("key1").unwrap();
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.ttl, Some(Duration::from_secs(5)));
        assert_eq!(cache.get("key1"), Some("value2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut cache = cache(2);

        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.set("a", "3".to_string(), None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_ttl_expiration() {
        let mut cache = cache(100);

        cache.set("x", "y".to_string(), Some(Duration::from_millis(100)));
        assert_eq!(cache.get("x"), Some("y".to_string()));

        sleep(Duration::from_millis(150));

        let misses_before = cache.stats().misses;
        assert_eq!(cache.get("x"), None);
        assert_eq!(cache.stats().misses, misses_before + 1);
        assert!(cache.is_empty(), "expired entry should be removed lazily");
    }

    #[test]
    fn test_default_ttl_applies() {
        let mut cache: BoundedCache<u32> = BoundedCache::new(10, Some(Duration::from_millis(50)));

        cache.set("k", 1, None);
        sleep(Duration::from_millis(80));

        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_no_default_ttl_never_expires() {
        let mut cache: BoundedCache<u32> = BoundedCache::new(10, None);

        cache.set("k", 1, None);

        assert!(cache.peek_entry("k").unwrap().ttl.is_none());
        assert_eq!(cache.get("k"), Some(1));
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = cache(3);

        cache.set("key1", "value1".to_string(), None);
        cache.set("key2", "value2".to_string(), None);
        cache.set("key3", "value3".to_string(), None);
        cache.set("key4", "value4".to_string(), None);

        assert_eq!(cache.len(), 3);
        assert!(!cache.has("key1"));
        assert!(cache.has("key2"));
        assert!(cache.has("key3"));
        assert!(cache.has("key4"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_lru_read_protects_entry() {
        let mut cache = cache(2);

        cache.set("k1", "v1".to_string(), None);
        cache.set("k2", "v2".to_string(), None);
        assert_eq!(cache.get("k1"), Some("v1".to_string()));
        cache.set("k3", "v3".to_string(), None);

        assert!(cache.has("k1"));
        assert!(!cache.has("k2"));
        assert!(cache.has("k3"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_has_does_not_touch_bookkeeping() {
        let mut cache = cache(2);

        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        assert!(cache.has("a"));
        assert!(!cache.has("zzz"));
        cache.set("c", "3".to_string(), None);

        // `has` must not have refreshed "a"
        assert!(!cache.has("a"));
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_has_removes_expired() {
        let mut cache = cache(10);

        cache.set("a", "1".to_string(), Some(Duration::from_millis(20)));
        sleep(Duration::from_millis(40));

        assert!(!cache.has("a"));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let mut cache = cache(0);

        cache.set("a", "1".to_string(), None);

        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_delete_where() {
        let mut cache = cache(10);

        cache.set("post:1", "a".to_string(), None);
        cache.set("post:2", "b".to_string(), None);
        cache.set("tag:1", "c".to_string(), None);

        let removed = cache.delete_where(|key, _| key.starts_with("post:"));

        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.has("tag:1"));
        // Evicted keys must also leave the LRU order
        cache.set("x", "1".to_string(), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_delete_where_by_value() {
        let mut cache = cache(10);
        cache.set("a", "keep".to_string(), None);
        cache.set("b", "drop".to_string(), None);

        assert_eq!(cache.delete_where(|_, value| value == "drop"), 1);
        assert!(cache.has("a"));
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut cache = cache(1);

        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.get("b");
        cache.get("a");
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_stats() {
        let mut cache = cache(100);

        cache.set("key1", "value1".to_string(), None);
        cache.get("key1");
        cache.get("nonexistent");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_hit_rate_after_n_misses_then_n_hits() {
        let mut cache = cache(10);
        let n = 7;

        for _ in 0..n {
            assert_eq!(cache.get("k"), None);
        }
        cache.set("k", "v".to_string(), None);
        for _ in 0..n {
            assert!(cache.get("k").is_some());
        }

        let stats = cache.stats();
        assert_eq!(stats.hits, n);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_cleanup_expired() {
        let mut cache = cache(100);

        cache.set("key1", "value1".to_string(), Some(Duration::from_millis(20)));
        cache.set("key2", "value2".to_string(), Some(Duration::from_secs(10)));

        sleep(Duration::from_millis(40));

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().misses, 0);
        assert_eq!(cache.get("key2"), Some("value2".to_string()));
    }
}
