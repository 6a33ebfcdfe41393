//! PostgreSQL implementation of the link repository.
//!
//! Links live in two tables: `links` holds the immutable id/URL pair and
//! `link_aliases` holds one row per alias, keyed by the alias itself. That
//! primary key is what makes alias ownership global: a second link trying
//! to claim an alias is refused with [`AppError::InvalidAlias`] and its save
//! is rolled back, while re-saving an alias the link already owns, even from
//! two transactions at once, succeeds.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::health::HealthProbe;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: String,
    url: String,
    aliases: Vec<String>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            url: row.url,
            aliases: row.aliases,
        }
    }
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn save(&self, link: &Link) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO links (id, url)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&link.id)
        .bind(&link.url)
        .execute(&mut *tx)
        .await?;

        // A concurrent save of the same alias for the same link is a no-op;
        // ownership is checked afterwards so only another link's claim fails.
        sqlx::query(
            r#"
            INSERT INTO link_aliases (alias, link_id, ordinal)
            SELECT a.alias, $1, (a.ord - 1)::int
            FROM UNNEST($2::text[]) WITH ORDINALITY AS a(alias, ord)
            ON CONFLICT (alias) DO NOTHING
            "#,
        )
        .bind(&link.id)
        .bind(&link.aliases)
        .execute(&mut *tx)
        .await?;

        let taken: Option<String> = sqlx::query_scalar(
            r#"
            SELECT alias FROM link_aliases
            WHERE alias = ANY($2::text[]) AND link_id <> $1
            LIMIT 1
            "#,
        )
        .bind(&link.id)
        .bind(&link.aliases)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(alias) = taken {
            return Err(AppError::invalid_alias(
                "alias is already taken",
                json!({ "alias": alias }),
            ));
        }

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT l.id, l.url,
                   COALESCE(
                       array_agg(a.alias ORDER BY a.ordinal, a.created_at) FILTER (WHERE a.alias IS NOT NULL),
                       '{}'
                   ) AS aliases
            FROM links l
            LEFT JOIN link_aliases a ON a.link_id = l.id
            WHERE l.url = $1
            GROUP BY l.id, l.url
            "#,
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT l.id, l.url, array_agg(a.alias ORDER BY a.ordinal, a.created_at) AS aliases
            FROM links l
            JOIN link_aliases a ON a.link_id = l.id
            WHERE l.id = (SELECT link_id FROM link_aliases WHERE alias = $1)
            GROUP BY l.id, l.url
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }
}

#[async_trait]
impl HealthProbe for PgLinkRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn check(&self) -> Result<String, String> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map(|_| "Connected".to_string())
            .map_err(|e| format!("Database error: {}", e))
    }
}
