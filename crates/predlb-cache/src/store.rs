use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

/// Key/value cache service holding probabilities.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<f64>;

    fn set(&self, key: &str, value: f64, ttl: Duration);

    fn delete(&self, key: &str);

    fn delete_many(&self, keys: &[String]) {
        for key in keys {
            self.delete(key);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: f64,
    ttl: Duration,
}

/// Each entry expires after the TTL it was written with.
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache backed by moka.
pub struct MokaStore {
    inner: Cache<String, Entry>,
}

impl MokaStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(EntryTtl)
                .build(),
        }
    }
}

impl CacheStore for MokaStore {
    fn get(&self, key: &str) -> Option<f64> {
        self.inner.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: f64, ttl: Duration) {
        self.inner.insert(key.to_string(), Entry { value, ttl });
    }

    fn delete(&self, key: &str) {
        self.inner.invalidate(key);
    }
}
