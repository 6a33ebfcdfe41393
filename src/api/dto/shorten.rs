//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
///
/// Only size limits are enforced here. URL syntax and alias rules belong to
/// the service so every caller gets the same error kinds.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[validate(length(min = 1, max = 2048))]
    pub url: String,

    /// Optional custom alias. Empty or absent means none was requested.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub alias: String,
}

/// Response carrying the short URL.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub tinee_url: String,
}
