//! In-process TTL cache used for rendered seat maps.
//!
//! The cache is an optimization for the UI polling pattern only: the
//! reservation, confirmation, and expiry paths never read it, and each of
//! them invalidates the affected key unconditionally after a write.
//! Staleness is bounded by the TTL.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A bounded-staleness map: entries expire `ttl` after insertion and
/// re-insertion replaces the entry wholesale.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a live entry. Expired entries are evicted on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().expect("cache lock poisoned");
            match entries.get(key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return Some(entry.value.clone());
                }
                Some(_) => {} // expired, evict below
                None => return None,
            }
        }
        self.entries
            .write()
            .expect("cache lock poisoned")
            .remove(key);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.write().expect("cache lock poisoned").insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Unconditional delete. Called by every write to the underlying data.
    pub fn invalidate(&self, key: &K) {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 1);
        assert_eq!(cache.get(&"k"), Some(1));
    }

    #[test]
    fn expired_entry_is_gone() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 1);
        assert_eq!(cache.get(&"k"), None);
    }

    #[test]
    fn invalidate_removes_entry() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 1);
        cache.invalidate(&"k");
        assert_eq!(cache.get(&"k"), None);
    }

    #[test]
    fn reinsert_replaces_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 1);
        cache.insert("k", 2);
        assert_eq!(cache.get(&"k"), Some(2));
    }
}
