//! Time-limited answer cache.
//!
//! Key repeat fires a move every few tens of milliseconds; each one would
//! otherwise cost two subprocess round trips to the tiling manager.  Entries
//! expire after a fixed TTL and are evicted when looked up or purged.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Upper bound on entries before expired ones are purged on insert.
const PURGE_THRESHOLD: usize = 128;

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (V, Instant)>,
}

impl<K: Eq + Hash, V: Copy> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Value for `key` if it was stored less than one TTL before `now`.
    pub fn get(&mut self, key: &K, now: Instant) -> Option<V> {
        let (value, stored_at) = *self.entries.get(key)?;
        if now.saturating_duration_since(stored_at) < self.ttl {
            Some(value)
        } else {
            self.entries.remove(key);
            None
        }
    }

    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        if self.entries.len() >= PURGE_THRESHOLD {
            self.purge_expired(now);
        }
        self.entries.insert(key, (value, now));
    }

    /// Drop every entry older than the TTL.
    pub fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (_, stored_at)| now.saturating_duration_since(*stored_at) < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let mut c = TtlCache::new(Duration::from_secs(3));
        let t0 = Instant::now();
        c.insert("77".to_string(), true, t0);
        assert_eq!(c.get(&"77".to_string(), t0 + Duration::from_secs(2)), Some(true));
    }

    #[test]
    fn expired_entry_is_evicted() {
        let mut c = TtlCache::new(Duration::from_secs(3));
        let t0 = Instant::now();
        c.insert("77".to_string(), true, t0);
        assert_eq!(c.get(&"77".to_string(), t0 + Duration::from_secs(3)), None);
        assert!(c.entries.is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let mut c = TtlCache::new(Duration::from_secs(3));
        let t0 = Instant::now();
        c.insert(1u32, true, t0);
        c.insert(2u32, false, t0 + Duration::from_secs(2));
        let later = t0 + Duration::from_secs(4);
        assert_eq!(c.get(&1, later), None);
        assert_eq!(c.get(&2, later), Some(false));
    }

    #[test]
    fn purge_keeps_fresh_entries() {
        let mut c = TtlCache::new(Duration::from_millis(100));
        let t0 = Instant::now();
        c.insert(1u32, true, t0);
        c.insert(2u32, true, t0 + Duration::from_millis(90));
        c.purge_expired(t0 + Duration::from_millis(150));
        assert_eq!(c.entries.len(), 1);
    }
}
