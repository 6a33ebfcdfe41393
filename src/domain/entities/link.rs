//! Link entity binding an original URL to its aliases.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shortened URL and every alias that resolves to it.
///
/// The first alias is always the one generated when the link was created;
/// custom aliases are appended after it and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub url: String,
    pub aliases: Vec<String>,
}

impl Link {
    /// Creates a link with a fresh identifier and its generated alias.
    pub fn new(url: impl Into<String>, generated_alias: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            aliases: vec![generated_alias.into()],
        }
    }

    /// Returns the alias produced at creation time.
    pub fn generated_alias(&self) -> Option<&str> {
        self.aliases.first().map(String::as_str)
    }

    /// Returns true if `alias` already resolves to this link.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    /// Appends a custom alias.
    ///
    /// Returns `false` without modifying the link if the alias is already present.
    pub fn push_alias(&mut self, alias: impl Into<String>) -> bool {
        let alias = alias.into();
        if self.has_alias(&alias) {
            return false;
        }
        self.aliases.push(alias);
        true
    }
}
