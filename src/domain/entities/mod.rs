//! Core domain entities.
//!
//! The service persists a single entity, [`Link`]: one original URL and the
//! ordered set of aliases that resolve to it. Entities are plain data; the
//! rules about when aliases may be appended live in
//! [`crate::application::services::LinkService`].

pub mod link;

pub use link::Link;
