//! Link shortening and resolution service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::AliasCache;
use crate::utils::alias_generator::{generate_alias, validate_custom_alias};
use crate::utils::url_validator::validate_url;

/// Number of aliases drawn for a new link before giving up on collisions.
pub const MAX_ALIAS_ATTEMPTS: usize = 5;

/// Operations the transport layer needs from the shortening core.
#[async_trait]
pub trait Shortener: Send + Sync {
    /// Shortens `url`, optionally registering `custom_alias` for it.
    ///
    /// An empty `custom_alias` means none was requested.
    async fn shorten(&self, url: &str, custom_alias: &str) -> Result<String, AppError>;

    /// Returns the link owning `alias`.
    async fn link_by_alias(&self, alias: &str) -> Result<Link, AppError>;

    /// Returns the original URL behind `alias`.
    async fn resolve_url(&self, alias: &str) -> Result<String, AppError> {
        Ok(self.link_by_alias(alias).await?.url)
    }
}

/// Service for creating and resolving shortened links.
///
/// Holds only immutable configuration and shared handles to its
/// collaborators, so one instance serves every request concurrently.
///
/// # Concurrency
///
/// Alias reservation is a read followed by a write. Two requests racing for
/// the same novel URL or custom alias can both pass the read; the store's
/// uniqueness rules decide which write wins and the loser receives the
/// store's error.
pub struct LinkService<R: LinkRepository + ?Sized, C: AliasCache + ?Sized> {
    config: ServiceConfig,
    link_repository: Arc<R>,
    alias_cache: Arc<C>,
}

impl<R: LinkRepository + ?Sized, C: AliasCache + ?Sized> LinkService<R, C> {
    /// Creates a new link service.
    pub fn new(config: ServiceConfig, link_repository: Arc<R>, alias_cache: Arc<C>) -> Self {
        Self {
            config,
            link_repository,
            alias_cache,
        }
    }

    /// Shortens a URL and returns the short URL `domain/alias`.
    ///
    /// # Flow
    ///
    /// 1. Validate the URL and, if given, the custom alias
    /// 2. Reuse the link already stored for the URL, or create one with a generated alias
    /// 3. Without a custom alias, return the generated alias
    /// 4. Otherwise append the custom alias unless another link owns it
    ///
    /// The custom alias is checked before the store is touched, so a
    /// malformed alias never leaves a half-finished link behind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL is malformed.
    ///
    /// Returns [`AppError::InvalidAlias`] if:
    /// - The custom alias is malformed
    /// - The custom alias belongs to a different link
    /// - No unique alias could be generated
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn shorten(&self, url: &str, custom_alias: &str) -> Result<String, AppError> {
        validate_url(url)?;
        if !custom_alias.is_empty() {
            validate_custom_alias(custom_alias)?;
        }

        let mut link = match self.link_repository.find_by_url(url).await? {
            Some(existing) => {
                debug!(link_id = %existing.id, "URL already shortened");
                existing
            }
            None => self.create_link(url).await?,
        };

        if custom_alias.is_empty() {
            let alias = link.generated_alias().ok_or_else(|| {
                AppError::internal("Stored link has no aliases", json!({ "id": link.id }))
            })?;
            return Ok(self.short_url(alias));
        }

        match self.link_repository.find_by_alias(custom_alias).await? {
            None => {
                if link.push_alias(custom_alias) {
                    self.link_repository.save(&link).await?;
                    info!(link_id = %link.id, alias = custom_alias, "Custom alias registered");
                }
            }
            Some(owner) if owner.id == link.id => {
                debug!(link_id = %link.id, alias = custom_alias, "Custom alias already registered");
            }
            Some(owner) => {
                debug!(
                    link_id = %link.id,
                    owner_id = %owner.id,
                    alias = custom_alias,
                    "Custom alias owned by another link"
                );
                return Err(AppError::invalid_alias(
                    "invalid alias",
                    json!({ "alias": custom_alias, "reason": "alias is already taken" }),
                ));
            }
        }

        Ok(self.short_url(custom_alias))
    }

    /// Creates and stores a new link for `url` with a generated alias.
    ///
    /// The URL is stored as given; callers validate it first. Each candidate
    /// alias is checked against the store before use and a colliding one is
    /// replaced, up to [`MAX_ALIAS_ATTEMPTS`] draws.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidAlias`] if every drawn alias was taken.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn create_link(&self, url: &str) -> Result<Link, AppError> {
        for attempt in 1..=MAX_ALIAS_ATTEMPTS {
            let alias = generate_alias();

            if self.link_repository.find_by_alias(&alias).await?.is_some() {
                warn!(attempt, alias = %alias, "Generated alias collision");
                continue;
            }

            let link = Link::new(url, alias);
            self.link_repository.save(&link).await?;
            info!(link_id = %link.id, alias = ?link.generated_alias(), "Link created");

            return Ok(link);
        }

        Err(AppError::invalid_alias(
            "invalid alias",
            json!({
                "reason": "could not generate a unique alias",
                "attempts": MAX_ALIAS_ATTEMPTS,
            }),
        ))
    }

    /// Retrieves the link owning `alias`, consulting the cache first.
    ///
    /// # Cache Strategy
    ///
    /// - **Cache hit**: returned immediately
    /// - **Cache miss or error**: read the store, then write the result back to the cache
    /// - **Cache write error**: logged and ignored
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkNotFound`] if no link owns the alias.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn link_by_alias(&self, alias: &str) -> Result<Link, AppError> {
        match self.alias_cache.get(alias).await {
            Ok(Some(link)) => {
                debug!("Cache HIT for {}", alias);
                return Ok(link);
            }
            Ok(None) => debug!("Cache MISS for {}", alias),
            Err(e) => warn!("Cache error for {}: {}", alias, e),
        }

        let link = self
            .link_repository
            .find_by_alias(alias)
            .await?
            .ok_or_else(|| AppError::link_not_found("link not found", json!({ "alias": alias })))?;

        if let Err(e) = self.alias_cache.set(alias, &link).await {
            warn!("Failed to cache alias {}: {}", alias, e);
        }

        Ok(link)
    }

    /// Resolves `alias` to the original URL.
    ///
    /// # Errors
    ///
    /// See [`Self::link_by_alias`].
    pub async fn resolve_url(&self, alias: &str) -> Result<String, AppError> {
        Ok(self.link_by_alias(alias).await?.url)
    }

    /// Composes the short URL for an alias.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.config.domain, alias)
    }
}

#[async_trait]
impl<R: LinkRepository + ?Sized, C: AliasCache + ?Sized> Shortener for LinkService<R, C> {
    async fn shorten(&self, url: &str, custom_alias: &str) -> Result<String, AppError> {
        LinkService::shorten(self, url, custom_alias).await
    }

    async fn link_by_alias(&self, alias: &str) -> Result<Link, AppError> {
        LinkService::link_by_alias(self, alias).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MockAliasCache, NullCache};
    use crate::utils::alias_generator::is_generated_alias;

    const DOMAIN: &str = "tinee.io";

    fn service(
        repo: MockLinkRepository,
        cache: MockAliasCache,
    ) -> LinkService<MockLinkRepository, MockAliasCache> {
        LinkService::new(ServiceConfig::new(DOMAIN), Arc::new(repo), Arc::new(cache))
    }

    fn uncached(repo: MockLinkRepository) -> LinkService<MockLinkRepository, NullCache> {
        LinkService::new(ServiceConfig::new(DOMAIN), Arc::new(repo), Arc::new(NullCache))
    }

    fn create_test_link(id: &str, url: &str, aliases: &[&str]) -> Link {
        Link {
            id: id.to_string(),
            url: url.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn store_error() -> AppError {
        AppError::internal("Database error", json!({}))
    }

    #[tokio::test]
    async fn test_shorten_with_generated_alias() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url()
            .withf(|arg| arg == "https://example.com/page")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_alias()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_save()
            .withf(|link| {
                link.url == "https://example.com/page"
                    && link.aliases.len() == 1
                    && is_generated_alias(&link.aliases[0])
            })
            .times(1)
            .returning(|_| Ok(()));

        let short_url = uncached(repo)
            .shorten("https://example.com/page", "")
            .await
            .unwrap();

        let alias = short_url.strip_prefix("tinee.io/").unwrap();
        assert!(is_generated_alias(alias), "{short_url}");
    }

    #[tokio::test]
    async fn test_shorten_existing_url_returns_generated_alias() {
        let mut repo = MockLinkRepository::new();
        let existing = create_test_link("A", "https://a.com", &["abc12345", "mylink"]);

        repo.expect_find_by_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_alias().times(0);
        repo.expect_save().times(0);

        let short_url = uncached(repo).shorten("https://a.com", "").await.unwrap();

        assert_eq!(short_url, "tinee.io/abc12345");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url().times(0);
        repo.expect_save().times(0);

        let result = uncached(repo).shorten("not-a-url", "").await;

        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_shorten_invalid_custom_alias_leaves_store_untouched() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url().times(0);
        repo.expect_find_by_alias().times(0);
        repo.expect_save().times(0);

        let result = uncached(repo).shorten("https://example.com/x", "ab").await;

        assert!(matches!(result, Err(AppError::InvalidAlias { .. })));
    }

    #[tokio::test]
    async fn test_shorten_custom_alias_on_new_url() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_find_by_alias()
            .withf(|alias| alias != "xxxx")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_alias()
            .withf(|arg| arg == "xxxx")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_save()
            .withf(|link| link.aliases.len() == 1)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_save()
            .withf(|link| link.aliases.len() == 2 && link.aliases[1] == "xxxx")
            .times(1)
            .returning(|_| Ok(()));

        let short_url = uncached(repo).shorten("https://x.xx", "xxxx").await.unwrap();

        assert_eq!(short_url, "tinee.io/xxxx");
    }

    #[tokio::test]
    async fn test_shorten_custom_alias_appends_to_existing_link() {
        let mut repo = MockLinkRepository::new();
        let existing = create_test_link("A", "https://example.com/page", &["abc12345"]);

        repo.expect_find_by_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_alias()
            .withf(|arg| arg == "mylink")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_save()
            .withf(|link| link.id == "A" && link.aliases == vec!["abc12345", "mylink"])
            .times(1)
            .returning(|_| Ok(()));

        let short_url = uncached(repo)
            .shorten("https://example.com/page", "mylink")
            .await
            .unwrap();

        assert_eq!(short_url, "tinee.io/mylink");
    }

    #[tokio::test]
    async fn test_shorten_custom_alias_already_registered() {
        let mut repo = MockLinkRepository::new();
        let existing = create_test_link("A", "https://a.com", &["abc12345", "mylink"]);
        let owner = existing.clone();

        repo.expect_find_by_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_alias()
            .withf(|arg| arg == "mylink")
            .times(1)
            .returning(move |_| Ok(Some(owner.clone())));
        repo.expect_save().times(0);

        let short_url = uncached(repo).shorten("https://a.com", "mylink").await.unwrap();

        assert_eq!(short_url, "tinee.io/mylink");
    }

    #[tokio::test]
    async fn test_shorten_custom_alias_owned_by_other_link() {
        let mut repo = MockLinkRepository::new();
        let link_a = create_test_link("A", "https://a.com", &["abc12345"]);
        let link_b = create_test_link("B", "https://b.com", &["xyz98765"]);

        repo.expect_find_by_url()
            .withf(|arg| arg == "https://b.com")
            .times(1)
            .returning(move |_| Ok(Some(link_b.clone())));
        repo.expect_find_by_alias()
            .withf(|arg| arg == "abc12345")
            .times(1)
            .returning(move |_| Ok(Some(link_a.clone())));
        repo.expect_save().times(0);

        let result = uncached(repo).shorten("https://b.com", "abc12345").await;

        assert!(matches!(result, Err(AppError::InvalidAlias { .. })));
    }

    #[tokio::test]
    async fn test_shorten_find_by_url_error() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url()
            .times(1)
            .returning(|_| Err(store_error()));
        repo.expect_save().times(0);

        let result = uncached(repo).shorten("https://x.xx", "").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_find_by_alias_error_while_creating_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_find_by_alias()
            .times(1)
            .returning(|_| Err(store_error()));
        repo.expect_save().times(0);

        let result = uncached(repo).shorten("https://x.xx", "").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_find_by_alias_error_while_adding_custom_alias() {
        let mut repo = MockLinkRepository::new();
        let existing = create_test_link("A", "https://x.xx", &["abc12345"]);

        repo.expect_find_by_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_alias()
            .withf(|arg| arg == "xxxx")
            .times(1)
            .returning(|_| Err(store_error()));
        repo.expect_save().times(0);

        let result = uncached(repo).shorten("https://x.xx", "xxxx").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_save_error_propagates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_find_by_alias().times(1).returning(|_| Ok(None));
        repo.expect_save()
            .times(1)
            .returning(|_| Err(store_error()));

        let result = uncached(repo).shorten("https://x.xx", "").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_create_link_retries_on_collision() {
        let mut repo = MockLinkRepository::new();
        let taken = create_test_link("Z", "https://z.com", &["taken000"]);
        let mut calls = 0;

        repo.expect_find_by_alias().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(Some(taken.clone()))
            } else {
                Ok(None)
            }
        });
        repo.expect_save().times(1).returning(|_| Ok(()));

        let link = uncached(repo).create_link("https://x.xx").await.unwrap();

        assert_eq!(link.url, "https://x.xx");
        assert_eq!(link.aliases.len(), 1);
    }

    #[tokio::test]
    async fn test_create_link_gives_up_after_max_attempts() {
        let mut repo = MockLinkRepository::new();
        let taken = create_test_link("Z", "https://z.com", &["taken000"]);

        repo.expect_find_by_alias()
            .times(MAX_ALIAS_ATTEMPTS)
            .returning(move |_| Ok(Some(taken.clone())));
        repo.expect_save().times(0);

        let result = uncached(repo).create_link("https://x.xx").await;

        assert!(matches!(result, Err(AppError::InvalidAlias { .. })));
    }

    #[tokio::test]
    async fn test_link_by_alias_cache_miss_populates_cache() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockAliasCache::new();
        let stored = create_test_link("A", "https://a.com", &["abc12345"]);

        cache
            .expect_get()
            .withf(|arg| arg == "abc12345")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_alias()
            .withf(|arg| arg == "abc12345")
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        cache
            .expect_set()
            .withf(|alias, link| alias == "abc12345" && link.url == "https://a.com")
            .times(1)
            .returning(|_, _| Ok(()));

        let url = service(repo, cache).resolve_url("abc12345").await.unwrap();

        assert_eq!(url, "https://a.com");
    }

    #[tokio::test]
    async fn test_link_by_alias_cache_hit_skips_store() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockAliasCache::new();
        let cached = create_test_link("A", "https://a.com", &["abc12345"]);

        cache
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(cached.clone())));
        cache.expect_set().times(0);
        repo.expect_find_by_alias().times(0);

        let link = service(repo, cache).link_by_alias("abc12345").await.unwrap();

        assert_eq!(link.id, "A");
    }

    #[tokio::test]
    async fn test_link_by_alias_cache_errors_are_swallowed() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockAliasCache::new();
        let stored = create_test_link("A", "https://a.com", &["abc12345"]);

        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));
        repo.expect_find_by_alias()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        cache
            .expect_set()
            .times(1)
            .returning(|_, _| Err(CacheError::OperationError("down".to_string())));

        let link = service(repo, cache).link_by_alias("abc12345").await.unwrap();

        assert_eq!(link.url, "https://a.com");
    }

    #[tokio::test]
    async fn test_link_by_alias_not_found() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockAliasCache::new();

        cache.expect_get().times(1).returning(|_| Ok(None));
        cache.expect_set().times(0);
        repo.expect_find_by_alias().times(1).returning(|_| Ok(None));

        let result = service(repo, cache).link_by_alias("missing1").await;

        assert!(matches!(result, Err(AppError::LinkNotFound { .. })));
    }

    #[tokio::test]
    async fn test_link_by_alias_store_error() {
        let mut repo = MockLinkRepository::new();
        let mut cache = MockAliasCache::new();

        cache.expect_get().times(1).returning(|_| Ok(None));
        cache.expect_set().times(0);
        repo.expect_find_by_alias()
            .times(1)
            .returning(|_| Err(store_error()));

        let result = service(repo, cache).link_by_alias("abc12345").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shortener_trait_delegates() {
        let mut repo = MockLinkRepository::new();
        let stored = create_test_link("A", "https://a.com", &["abc12345"]);
        repo.expect_find_by_alias()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let shortener: Arc<dyn Shortener> = Arc::new(uncached(repo));

        assert_eq!(shortener.resolve_url("abc12345").await.unwrap(), "https://a.com");
    }

    #[test]
    fn test_short_url() {
        let service = uncached(MockLinkRepository::new());
        assert_eq!(service.short_url("xxxx"), "tinee.io/xxxx");
    }
}
