//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long one, optionally under a custom alias.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/page",
///   "alias": "mylink"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "tineeUrl": "tinee.io/mylink"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed, the URL is invalid, or
/// the alias is invalid or owned by another link.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let tinee_url = state
        .shortener
        .shorten(&payload.url, &payload.alias)
        .await?;

    Ok(Json(ShortenResponse { tinee_url }))
}
