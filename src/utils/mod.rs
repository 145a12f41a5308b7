//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Long URL sanitization and canonical form

pub mod code_generator;
pub mod url_normalizer;
