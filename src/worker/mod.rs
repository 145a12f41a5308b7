//! Background tasks running alongside the HTTP server.

pub mod cleanup;

pub use cleanup::run_cleanup_worker;
