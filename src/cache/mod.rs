// src/cache/mod.rs
// Expiring-cache layer: the backend trait plus an in-process TTL cache.
// Uses async-trait to properly handle async functions in traits.

pub mod redis_cache;
pub use redis_cache::RedisCache;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Expiring cache contract. Absence after expiry is indistinguishable
/// from never-set, and an entry may vanish at any time without affecting
/// correctness; the durable store stays authoritative.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<f64>, CacheError>;
    async fn set(&self, key: &str, value: f64, ttl: Duration) -> Result<(), CacheError>;
}

/// Cache entry with timestamp for TTL checking
#[derive(Debug, Clone)]
struct CacheEntry {
    value: f64,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(value: f64, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// Simple in-memory cache with per-key TTL. Stands in for redis in tests
/// and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<f64>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value));
            }
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: f64, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_get() {
        let cache = MemoryCache::new();
        cache
            .set("calc:add:1:2", 3.0, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("calc:add:1:2").await.unwrap(), Some(3.0));
        assert_eq!(cache.get("calc:add:9:9").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_entries_expire() {
        let cache = MemoryCache::new();
        cache
            .set("calc:add:1:2", 3.0, Duration::from_millis(40))
            .await
            .unwrap();
        assert_eq!(cache.get("calc:add:1:2").await.unwrap(), Some(3.0));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.get("calc:add:1:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_overwrite_last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("k", 1.0, Duration::from_secs(60)).await.unwrap();
        cache.set("k", 2.0, Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(2.0));
        assert_eq!(cache.len(), 1);
    }
}
