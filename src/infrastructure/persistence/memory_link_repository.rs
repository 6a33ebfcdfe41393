//! In-memory implementation of the link repository.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::health::HealthProbe;

#[derive(Debug, Default)]
struct Tables {
    links: HashMap<String, Link>,
    id_by_url: HashMap<String, String>,
    id_by_alias: HashMap<String, String>,
}

/// Process-local link store.
///
/// Enforces the same uniqueness rules as the PostgreSQL schema: one link per
/// URL and one owner per alias. All three indexes sit behind a single lock
/// so a save is applied atomically. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    tables: RwLock<Tables>,
}

impl MemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.tables.read().await.links.len()
    }

    /// Returns true if no link has been saved yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn save(&self, link: &Link) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;

        if let Some(owner) = tables.id_by_url.get(&link.url)
            && owner != &link.id
        {
            return Err(AppError::internal(
                "Unique constraint violation",
                json!({ "constraint": "links_url_key" }),
            ));
        }

        if let Some(alias) = link.aliases.iter().find(|alias| {
            tables
                .id_by_alias
                .get(*alias)
                .is_some_and(|owner| owner != &link.id)
        }) {
            return Err(AppError::invalid_alias(
                "alias is already taken",
                json!({ "alias": alias }),
            ));
        }

        let stored = tables
            .links
            .entry(link.id.clone())
            .or_insert_with(|| Link {
                id: link.id.clone(),
                url: link.url.clone(),
                aliases: Vec::with_capacity(link.aliases.len()),
            });
        for alias in &link.aliases {
            stored.push_alias(alias.clone());
        }
        let url = stored.url.clone();

        tables.id_by_url.insert(url, link.id.clone());
        for alias in &link.aliases {
            tables.id_by_alias.insert(alias.clone(), link.id.clone());
        }

        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        let tables = self.tables.read().await;

        Ok(tables
            .id_by_url
            .get(url)
            .and_then(|id| tables.links.get(id))
            .cloned())
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError> {
        let tables = self.tables.read().await;

        Ok(tables
            .id_by_alias
            .get(alias)
            .and_then(|id| tables.links.get(id))
            .cloned())
    }
}

#[async_trait]
impl HealthProbe for MemoryLinkRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn check(&self) -> Result<String, String> {
        Ok(format!("In-memory store, {} links", self.len().await))
    }
}
