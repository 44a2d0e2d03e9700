use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE};

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub version: String,
    pub created_at: Instant,
}

#[derive(Debug, Clone)]
pub struct CacheLookup<V> {
    pub value: V,
    // sha256 prefix of the serialized value
    pub version: String,
    pub hit: bool,
}

// TTL cache keyed by the query dimensions that produced a value
pub struct TtlCache<V> {
    name: &'static str,
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone + Serialize> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> CacheLookup<V>
    where
        F: FnOnce() -> V,
    {
        self.get_or_compute_at(key, Instant::now(), compute)
    }

    pub fn get_or_compute_at<F>(&self, key: &str, now: Instant, compute: F) -> CacheLookup<V>
    where
        F: FnOnce() -> V,
    {
        // check cache first
        if let Some(entry) = self.entries.get(key) {
            if now.saturating_duration_since(entry.created_at) < self.ttl {
                CACHE_HITS.inc();
                debug!(cache = self.name, key, "cache hit");
                return CacheLookup {
                    value: entry.value.clone(),
                    version: entry.version.clone(),
                    hit: true,
                };
            }
        }
        CACHE_MISSES.inc();

        let value = compute();
        let version = make_version(&value);
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                version: version.clone(),
                created_at: now,
            },
        );
        CACHE_SIZE
            .with_label_values(&[self.name])
            .set(self.entries.len() as f64);
        debug!(cache = self.name, key, "cache refreshed");

        CacheLookup {
            value,
            version,
            hit: false,
        }
    }

    // Drops entries past their TTL, returns how many were removed
    pub fn prune(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.created_at) < self.ttl);
        CACHE_SIZE
            .with_label_values(&[self.name])
            .set(self.entries.len() as f64);
        before.saturating_sub(self.entries.len())
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
        CACHE_SIZE.with_label_values(&[self.name]).set(0.0);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// hash of the serialized value, used as the payload version
pub fn make_version<V: Serialize>(value: &V) -> String {
    let mut hasher = Sha256::new();
    match serde_json::to_vec(value) {
        Ok(bytes) => hasher.update(&bytes),
        Err(_) => hasher.update(b"unserializable"),
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}
