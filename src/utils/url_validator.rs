//! Validation of URLs submitted for shortening.
//!
//! Only absolute `http`/`https` URLs pointing at a domain name are accepted.
//! The URL is stored exactly as submitted, so validation never rewrites it.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use url::{Host, Url};

use crate::error::AppError;

/// A single DNS label as produced by the `url` crate (lowercase, punycode).
static DOMAIN_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").unwrap());

/// Reasons a URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must not contain whitespace")]
    Whitespace,

    #[error("URL must not contain control characters")]
    ControlCharacter,

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a domain name host")]
    MissingDomain,

    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),
}

/// Validates a URL submitted for shortening.
///
/// # Rules
///
/// 1. **Syntax**: must parse as an absolute URL, without whitespace or control characters
/// 2. **Protocol**: only HTTP and HTTPS are allowed
/// 3. **Host**: a domain name (not an IP literal) with at least two labels
/// 4. **Top-level label**: at least two characters and not purely numeric
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] carrying the rejection reason.
///
/// # Examples
///
/// ```
/// use tinee::utils::url_validator::validate_url;
///
/// assert!(validate_url("https://x.xx").is_ok());
/// assert!(validate_url("x.xx").is_err());
/// assert!(validate_url("https://x").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), AppError> {
    check_url(input).map_err(|e| {
        AppError::invalid_url("invalid URL", json!({ "url": input, "reason": e.to_string() }))
    })
}

fn check_url(input: &str) -> Result<(), UrlValidationError> {
    if input.chars().any(char::is_whitespace) {
        return Err(UrlValidationError::Whitespace);
    }

    // `Url::parse` percent-encodes these silently, but the input is stored raw.
    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    let domain = match url.host() {
        Some(Host::Domain(domain)) => domain,
        _ => return Err(UrlValidationError::MissingDomain),
    };

    check_domain(domain)
}

fn check_domain(domain: &str) -> Result<(), UrlValidationError> {
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 {
        return Err(UrlValidationError::InvalidDomain(domain.to_string()));
    }

    if !labels.iter().all(|label| DOMAIN_LABEL_REGEX.is_match(label)) {
        return Err(UrlValidationError::InvalidDomain(domain.to_string()));
    }

    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(UrlValidationError::InvalidDomain(domain.to_string()));
    }

    Ok(())
}
