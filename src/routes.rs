//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /r/{code}`         - Short link redirect
//! - `GET  /health`           - Health check: storage
//! - `POST /api/urls`         - Create a short URL (rate limited)
//! - `GET  /api/urls/{code}`  - Short URL metadata
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on creation
//! - **Path normalization** - Trailing slash handling

use std::sync::Arc;

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit::CreateRateLimitConfig, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Assembles all routes and middleware, without path normalization.
///
/// Requests must carry `ConnectInfo<SocketAddr>` for the rate limiter to
/// identify the client.
pub fn build_router(state: AppState, rate_limit: Arc<CreateRateLimitConfig>) -> Router {
    Router::new()
        .route("/r/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::url_routes(rate_limit))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with trailing slashes trimmed.
pub fn app_router(state: AppState, rate_limit: Arc<CreateRateLimitConfig>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, rate_limit))
}
