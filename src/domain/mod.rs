//! Domain layer containing the mapping entity and the store contract.
//!
//! This module is independent of infrastructure concerns: it defines what a
//! short-link mapping is and which operations a store has to provide, nothing
//! about how those operations are carried out.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Lifecycle rules live in [`crate::application::services::MappingService`]

pub mod entities;
pub mod repositories;
