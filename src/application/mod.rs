//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository and
//! cache calls with validation rules. Handlers and the admin CLI talk to it
//! through the [`services::Shortener`] trait.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Alias assignment and resolution

pub mod services;
