//! HTTP server initialization and runtime setup.
//!
//! Wires the store, the cache and the link service together and runs the
//! Axum server until a shutdown signal arrives.

use crate::application::services::{LinkService, Shortener};
use crate::config::Config;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{AliasCache, NullCache, RedisCache};
use crate::infrastructure::health::HealthProbe;
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Store handles: the repository used by the service and its health probe.
type Store = (Arc<dyn LinkRepository>, Arc<dyn HealthProbe>);

/// Cache handles: the cache used by the service and its health probe.
type Cache = (Arc<dyn AliasCache>, Arc<dyn HealthProbe>);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Redis cache (or NullCache fallback)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = match &config.database_url {
        Some(url) => Some(connect_database(&config, url).await?),
        None => None,
    };

    let (link_repository, store_health) = build_store(pool.clone());
    let (alias_cache, cache_health) = build_cache(&config).await;

    let service = LinkService::new(config.service.clone(), link_repository, alias_cache);
    let shortener: Arc<dyn Shortener> = Arc::new(service);

    let state = AppState::new(shortener, store_health, cache_health);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the connection pool and applies pending migrations.
async fn connect_database(config: &Config, url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

fn build_store(pool: Option<PgPool>) -> Store {
    match pool {
        Some(pool) => {
            let repository = Arc::new(PgLinkRepository::new(Arc::new(pool)));
            let store: Arc<dyn LinkRepository> = repository.clone();
            let probe: Arc<dyn HealthProbe> = repository;
            (store, probe)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, links are kept in memory");
            let repository = Arc::new(MemoryLinkRepository::new());
            let store: Arc<dyn LinkRepository> = repository.clone();
            let probe: Arc<dyn HealthProbe> = repository;
            (store, probe)
        }
    }
}

async fn build_cache(config: &Config) -> Cache {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                let redis = Arc::new(redis);
                let cache: Arc<dyn AliasCache> = redis.clone();
                let probe: Arc<dyn HealthProbe> = redis;
                return (cache, probe);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
    }

    let null = Arc::new(NullCache::new());
    let cache: Arc<dyn AliasCache> = null.clone();
    let probe: Arc<dyn HealthProbe> = null;
    (cache, probe)
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
