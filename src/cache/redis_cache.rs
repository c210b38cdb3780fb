// src/cache/redis_cache.rs - redis-backed expiring cache

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{CacheError, ResultCache};

/// Wire shape of a cached value. Kept as JSON so entries stay readable
/// from redis-cli.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResult {
    pub result: f64,
}

/// Redis-backed cache over a shared connection manager.
#[derive(Clone)]
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connect to redis. Fails fast when the server is unreachable; an
    /// unreachable cache is an infrastructure error, not a silent no-op.
    pub async fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(redis_url).map_err(|e| CacheError::Redis(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))?;
        info!(url = %redis_url, "Redis cache connected");
        Ok(Self { client: manager })
    }
}

#[async_trait]
impl ResultCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<f64>, CacheError> {
        let mut conn = self.client.clone();
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))?;

        match value {
            Some(json) => {
                let cached: CachedResult = serde_json::from_str(&json)
                    .map_err(|e| CacheError::Serialization(e.to_string()))?;
                Ok(Some(cached.result))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: f64, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.client.clone();
        let json = serde_json::to_string(&CachedResult { result: value })
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        conn.set_ex::<_, _, ()>(key, json, ttl.as_secs())
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))?;
        Ok(())
    }
}
