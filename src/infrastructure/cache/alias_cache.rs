//! Alias cache trait and error types.

use async_trait::async_trait;

use crate::domain::entities::Link;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Best-effort cache of alias to [`Link`] lookups.
///
/// Implementations report failures honestly; it is the caller's job to treat
/// them as misses (see [`crate::application::services::LinkService::link_by_alias`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with optional TTL
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasCache: Send + Sync {
    /// Looks up the link cached under `alias`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get(&self, alias: &str) -> CacheResult<Option<Link>>;

    /// Caches `link` under `alias`.
    async fn set(&self, alias: &str, link: &Link) -> CacheResult<()>;
}
