//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::Shortener;
use crate::infrastructure::health::HealthProbe;

/// Handles to the shortening core and the probes behind `/api/v1/health`.
///
/// Cloned per request; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<dyn Shortener>,
    pub store_health: Arc<dyn HealthProbe>,
    pub cache_health: Arc<dyn HealthProbe>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        store_health: Arc<dyn HealthProbe>,
        cache_health: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            shortener,
            store_health,
            cache_health,
        }
    }
}
