//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with the next value of a monotonic sequence.
/// The smallest stamp is the least recently used key, so eviction is
/// O(log n) and never depends on clock resolution.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Access stamp -> key, ordered oldest first
    order: BTreeMap<u64, String>,
    /// Key -> its current access stamp
    stamps: HashMap<String, u64>,
    /// Next stamp to hand out
    next_stamp: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        match self.stamps.get_mut(key) {
            Some(old) => {
                self.order.remove(&*old);
                *old = stamp;
            }
            None => {
                self.stamps.insert(key.to_string(), stamp);
            }
        }
        self.order.insert(stamp, key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Evicts everything, oldest first.
    fn drain(lru: &mut LruTracker) -> Vec<String> {
        std::iter::from_fn(|| lru.evict_oldest()).collect()
    }

    #[test]
    fn test_lru_new() {
        let mut lru = LruTracker::new();
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_touch_new_keys() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");

        assert_eq!(drain(&mut lru), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");
        lru.touch("key1");

        assert_eq!(drain(&mut lru), vec!["key2", "key3", "key1"]);
    }

    #[test]
    fn test_lru_evict_oldest() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");

        assert_eq!(lru.evict_oldest(), Some("key1".to_string()));
        assert_eq!(lru.evict_oldest(), Some("key2".to_string()));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key2");
        lru.touch("key3");
        lru.remove("key2");
        lru.remove("nonexistent");

        assert_eq!(drain(&mut lru), vec!["key1", "key3"]);
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        // Re-touch in a new order: oldest to newest is now a, c, b
        lru.touch("a");
        lru.touch("c");
        lru.touch("b");

        assert_eq!(drain(&mut lru), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_lru_touch_same_key_multiple_times() {
        let mut lru = LruTracker::new();

        lru.touch("key1");
        lru.touch("key1");
        lru.touch("key1");

        assert_eq!(drain(&mut lru), vec!["key1"]);
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruTracker::new();

        lru.touch("a");
        lru.touch("b");
        lru.clear();

        assert_eq!(lru.evict_oldest(), None);
        // Keys touched after a clear are tracked afresh
        lru.touch("b");
        assert_eq!(drain(&mut lru), vec!["b"]);
    }
}
