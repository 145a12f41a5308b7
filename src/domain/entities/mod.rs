//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Mapping`] - A short code bound to a long URL with expiry and hit counter
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`NewMapping`] carries only what the caller chooses, the store assigns the
//! rest (`id`, `created_at`, `hit_count`).

pub mod mapping;

pub use mapping::{Mapping, NewMapping};
