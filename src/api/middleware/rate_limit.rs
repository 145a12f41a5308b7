//! Per-client rate limiting for short URL creation.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::PeerIpKeyExtractor,
};
use tracing::debug;

/// Governor configuration keyed by peer IP.
pub type CreateRateLimitConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Builds the token bucket configuration for `POST /api/urls`.
///
/// # Limits
///
/// - **Rate**: `per_minute` requests per minute, replenished evenly
/// - **Burst**: `burst` requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Errors
///
/// Fails if either limit is zero.
pub fn create_config(per_minute: u32, burst: u32) -> Result<Arc<CreateRateLimitConfig>> {
    anyhow::ensure!(per_minute > 0, "rate limit must allow at least one request per minute");

    let period = Duration::from_secs(60) / per_minute;

    let config = GovernorConfigBuilder::default()
        .period(period)
        .burst_size(burst)
        .finish()
        .context("Invalid rate limit configuration")?;

    Ok(Arc::new(config))
}

/// Wraps a configuration into a tower layer.
///
/// # Example
///
/// ```rust,ignore
/// let config = rate_limit::create_config(60, 10)?;
/// let routes = Router::new()
///     .route("/urls", post(create_url_handler).layer(rate_limit::layer(config)));
/// ```
pub fn layer(
    config: Arc<CreateRateLimitConfig>,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    GovernorLayer::new(config)
}

/// Periodically drops per-client buckets that have fully replenished.
///
/// Keeps the limiter's memory bounded by the number of recently active
/// clients.
pub fn spawn_eviction(config: &Arc<CreateRateLimitConfig>, every: Duration) -> JoinHandle<()> {
    let limiter = config.limiter().clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            debug!("Rate limiter tracking {} clients", limiter.len());
        }
    })
}
