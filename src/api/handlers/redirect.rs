//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its original URL.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// Lookups go through the service, which consults the alias cache before
/// the store.
///
/// # Errors
///
/// Returns 404 Not Found if no link owns the alias.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.shortener.resolve_url(&alias).await?;
    debug!(alias = %alias, "Redirecting");

    Ok(Redirect::to(&url))
}
