//! Alias and URL helpers shared by the service and the admin CLI.
//!
//! - [`alias_generator`] - Alias generation and custom alias validation
//! - [`url_validator`] - Validation of URLs submitted for shortening

pub mod alias_generator;
pub mod url_validator;
