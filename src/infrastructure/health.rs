//! Liveness probes for the store and cache backends.

use async_trait::async_trait;

/// Reports whether a backend is reachable.
///
/// Kept apart from the storage and cache contracts so those stay limited to
/// the operations the shortening service needs.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Short backend name shown in health reports (e.g. `"postgres"`).
    fn backend(&self) -> &'static str;

    /// Returns a status message on success, or the failure reason.
    async fn check(&self) -> Result<String, String>;
}
