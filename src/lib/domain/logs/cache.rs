//! A small read-through cache whose entries expire after a fixed time.

use std::{
    collections::HashMap,
    future::Future,
    hash::Hash,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Caches values by key for `ttl`. Entries are never invalidated early; readers
/// accept values up to `ttl` old.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// How long entries live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `key` unless it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let fresh = entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone());

        if fresh.is_none() {
            entries.remove(key);
        }

        fresh
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: K, value: V) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, (Instant::now(), value));
    }

    /// Returns the cached value for `key`, or loads, caches and returns it.
    /// Failed loads are not cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = load().await?;

        self.insert(key, value.clone());

        Ok(value)
    }
}
