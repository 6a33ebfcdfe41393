//! Alias cache for fast redirect lookups.
//!
//! Provides an [`AliasCache`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation for testing/disabled caching
//!
//! The cache is never authoritative. It is only populated from records the
//! store has already returned, and every failure degrades to a store lookup.

mod alias_cache;
mod null_cache;
mod redis_cache;

pub use alias_cache::{AliasCache, CacheError, CacheResult};
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;

#[cfg(test)]
pub use alias_cache::MockAliasCache;
