//! API route configuration.
//!
//! Creation is rate limited per client IP via
//! [`crate::api::middleware::rate_limit`]; lookups are not.

use std::sync::Arc;

use crate::api::handlers::{create_url_handler, url_metadata_handler};
use crate::api::middleware::rate_limit::{self, CreateRateLimitConfig};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short URL management routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /urls`          - Create (or reuse) a short URL
/// - `GET  /urls/{code}`   - Metadata for a short URL
pub fn url_routes(rate_limit: Arc<CreateRateLimitConfig>) -> Router<AppState> {
    Router::new()
        .route(
            "/urls",
            post(create_url_handler).layer(rate_limit::layer(rate_limit)),
        )
        .route("/urls/{code}", get(url_metadata_handler))
}
