//! Redis-backed alias cache.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

use super::alias_cache::{AliasCache, CacheError, CacheResult};
use crate::domain::entities::Link;
use crate::infrastructure::health::HealthProbe;

/// Redis cache storing each [`Link`] as JSON under its alias.
///
/// Uses `ConnectionManager` for automatic reconnection and connection reuse.
/// Errors are returned to the caller, which decides to degrade to the store.
pub struct RedisCache {
    client: ConnectionManager,
    ttl_seconds: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `ttl_seconds` - expiry applied to cached entries; `0` keeps them until evicted
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            ttl_seconds,
            key_prefix: "alias:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, alias: &str) -> String {
        format!("{}{}", self.key_prefix, alias)
    }
}

#[async_trait]
impl AliasCache for RedisCache {
    async fn get(&self, alias: &str) -> CacheResult<Option<Link>> {
        let key = self.build_key(alias);
        let mut conn = self.client.clone();

        let payload = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        match payload {
            Some(json) => {
                debug!("Cache HIT: {}", alias);
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => {
                debug!("Cache MISS: {}", alias);
                Ok(None)
            }
        }
    }

    async fn set(&self, alias: &str, link: &Link) -> CacheResult<()> {
        let key = self.build_key(alias);
        let payload = serde_json::to_string(link)?;
        let mut conn = self.client.clone();

        let result = if self.ttl_seconds == 0 {
            conn.set::<_, _, ()>(&key, payload).await
        } else {
            conn.set_ex::<_, _, ()>(&key, payload, self.ttl_seconds)
                .await
        };

        result.map_err(|e| CacheError::OperationError(format!("SET {}: {}", key, e)))?;
        debug!("Cache SET: {} -> {}", alias, link.url);

        Ok(())
    }
}

#[async_trait]
impl HealthProbe for RedisCache {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> Result<String, String> {
        let mut conn = self.client.clone();
        conn.ping::<()>()
            .await
            .map(|_| "Redis connected".to_string())
            .map_err(|e| format!("Redis PING failed: {}", e))
    }
}
