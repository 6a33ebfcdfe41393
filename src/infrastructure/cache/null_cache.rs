//! No-op cache implementation for testing or disabled caching.

use async_trait::async_trait;
use tracing::debug;

use super::alias_cache::{AliasCache, CacheResult};
use crate::domain::entities::Link;
use crate::infrastructure::health::HealthProbe;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or unreachable at startup.
/// Every lookup misses and every write succeeds without storing anything.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AliasCache for NullCache {
    async fn get(&self, _alias: &str) -> CacheResult<Option<Link>> {
        Ok(None)
    }

    async fn set(&self, _alias: &str, _link: &Link) -> CacheResult<()> {
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for NullCache {
    fn backend(&self) -> &'static str {
        "none"
    }

    async fn check(&self) -> Result<String, String> {
        Ok("Caching disabled".to_string())
    }
}
