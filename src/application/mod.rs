//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers, the cleanup worker and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::mapping_service::MappingService`] - Mapping lifecycle: create-or-reuse,
//!   resolve, metadata and expired-entry cleanup

pub mod services;
