#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tinee::application::services::{LinkService, Shortener};
use tinee::config::ServiceConfig;
use tinee::domain::entities::Link;
use tinee::infrastructure::cache::{AliasCache, CacheResult, NullCache};
use tinee::infrastructure::health::HealthProbe;
use tinee::infrastructure::persistence::MemoryLinkRepository;
use tinee::state::AppState;
use tokio::sync::Mutex;

pub const DOMAIN: &str = "tinee.io";

/// Cache that remembers everything written to it and counts lookups.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, Link>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
}

impl RecordingCache {
    pub async fn cached(&self, alias: &str) -> Option<Link> {
        self.entries.lock().await.get(alias).cloned()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AliasCache for RecordingCache {
    async fn get(&self, alias: &str) -> CacheResult<Option<Link>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().await.get(alias).cloned())
    }

    async fn set(&self, alias: &str, link: &Link) -> CacheResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .await
            .insert(alias.to_string(), link.clone());
        Ok(())
    }
}

/// Health probe that always reports a failure.
pub struct FailingProbe;

#[async_trait]
impl HealthProbe for FailingProbe {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn check(&self) -> Result<String, String> {
        Err("Database error: connection refused".to_string())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryLinkRepository>,
    pub cache: Arc<RecordingCache>,
}

pub fn create_test_service(
    store: Arc<MemoryLinkRepository>,
    cache: Arc<RecordingCache>,
) -> LinkService<MemoryLinkRepository, RecordingCache> {
    LinkService::new(ServiceConfig::new(DOMAIN), store, cache)
}

pub fn create_test_context() -> TestContext {
    let store = Arc::new(MemoryLinkRepository::new());
    let cache = Arc::new(RecordingCache::default());

    let shortener: Arc<dyn Shortener> =
        Arc::new(create_test_service(store.clone(), cache.clone()));

    let state = AppState::new(shortener, store.clone(), Arc::new(NullCache::new()));

    TestContext {
        state,
        store,
        cache,
    }
}

pub fn create_test_state() -> AppState {
    create_test_context().state
}

/// Strips the service domain from a short URL.
pub fn alias_of(short_url: &str) -> &str {
    short_url
        .strip_prefix("tinee.io/")
        .unwrap_or_else(|| panic!("unexpected short URL: {short_url}"))
}
