//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Alias cache abstractions (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL and in-memory link stores
//! - [`health`] - Liveness probes reported by the health endpoint

pub mod cache;
pub mod health;
pub mod persistence;
