//! Repository trait for link persistence.

use crate::domain::entities::Link;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store of [`Link`] records.
///
/// The store is authoritative: every alias it holds maps to exactly one link.
/// Absence is reported as `Ok(None)`; errors are reserved for failures of the
/// backend itself.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts the link or updates the existing record with the same id.
    ///
    /// The URL of an existing record is never changed; aliases missing from
    /// the stored record are appended.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidAlias`] if one of the aliases is already
    /// owned by a different link.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn save(&self, link: &Link) -> Result<(), AppError>;

    /// Finds the link created for an exact original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError>;

    /// Finds the link owning an alias, generated or custom.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError>;
}
