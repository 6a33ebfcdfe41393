//! Alias generation and validation utilities.
//!
//! Generated aliases are drawn from the 62-symbol alphabet `[A-Za-z0-9]`
//! with a cryptographically secure generator, so they can be neither guessed
//! nor enumerated. Custom aliases share the alphabet but only need to meet a
//! minimum length.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Length of every generated alias.
pub const GENERATED_ALIAS_LENGTH: usize = 8;

/// Shortest custom alias accepted.
pub const MIN_CUSTOM_ALIAS_LENGTH: usize = 4;

/// Generates a random alias of [`GENERATED_ALIAS_LENGTH`] characters.
///
/// Every character is sampled independently and uniformly from the
/// alphanumeric alphabet using the thread-local CSPRNG, which is seeded from
/// the operating system.
///
/// With 62^8 (about 2.2 * 10^14) possible aliases, the chance of a collision
/// stays below one in a thousand until roughly 660 000 links exist; the
/// service still checks the store before using an alias.
pub fn generate_alias() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ALIAS_LENGTH)
        .map(char::from)
        .collect()
}

/// Returns true if `alias` has the shape of a generated alias.
pub fn is_generated_alias(alias: &str) -> bool {
    alias.len() == GENERATED_ALIAS_LENGTH && alias.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Length: at least [`MIN_CUSTOM_ALIAS_LENGTH`] characters
/// - Allowed characters: ASCII letters and digits
///
/// # Errors
///
/// Returns [`AppError::InvalidAlias`] if any rule is violated.
///
/// # Examples
///
/// ```
/// use tinee::utils::alias_generator::validate_custom_alias;
///
/// assert!(validate_custom_alias("mylink").is_ok());
/// assert!(validate_custom_alias("ab").is_err());
/// assert!(validate_custom_alias("my-link").is_err());
/// ```
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if !alias.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::invalid_alias(
            "invalid alias",
            json!({ "alias": alias, "reason": "only letters and digits are allowed" }),
        ));
    }

    if alias.len() < MIN_CUSTOM_ALIAS_LENGTH {
        return Err(AppError::invalid_alias(
            "invalid alias",
            json!({
                "alias": alias,
                "reason": format!("must be at least {MIN_CUSTOM_ALIAS_LENGTH} characters"),
            }),
        ));
    }

    Ok(())
}
