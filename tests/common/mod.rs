#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, TimeDelta, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use url_shortener::api::middleware::rate_limit;
use url_shortener::application::services::MappingSettings;
use url_shortener::domain::entities::Mapping;
use url_shortener::domain::repositories::MappingRepository;
use url_shortener::infrastructure::persistence::InMemoryMappingRepository;
use url_shortener::routes::build_router;
use url_shortener::state::AppState;

pub const BASE_URL: &str = "http://sho.rt";

/// Injects a fixed peer address so the per-IP rate limiter can key requests.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn test_settings() -> MappingSettings {
    MappingSettings {
        code_length: 6,
        default_expiry_days: 30,
        max_retries: 3,
        base_url: BASE_URL.to_string(),
        store_timeout: Duration::from_secs(2),
    }
}

pub fn create_test_state() -> (AppState, Arc<InMemoryMappingRepository>) {
    let repo = Arc::new(InMemoryMappingRepository::new());
    let state = AppState::new(repo.clone(), test_settings());
    (state, repo)
}

pub fn create_state_with(repository: Arc<dyn MappingRepository>) -> AppState {
    AppState::new(repository, test_settings())
}

/// Full router with a rate limit high enough not to interfere.
pub fn test_server(state: AppState) -> TestServer {
    test_server_with_limits(state, 10_000, 1_000)
}

pub fn test_server_with_limits(state: AppState, per_minute: u32, burst: u32) -> TestServer {
    let limiter = rate_limit::create_config(per_minute, burst).unwrap();
    let app = build_router(state, limiter).layer(MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

pub fn mapping(id: i64, code: &str, long_url: &str, expires_at: Option<DateTime<Utc>>) -> Mapping {
    Mapping::new(
        id,
        code.to_string(),
        long_url.to_string(),
        Utc::now() - TimeDelta::days(2),
        expires_at,
        0,
    )
}

pub fn live_mapping(id: i64, code: &str, long_url: &str) -> Mapping {
    mapping(id, code, long_url, Some(Utc::now() + TimeDelta::days(1)))
}

pub fn expired_mapping(id: i64, code: &str, long_url: &str) -> Mapping {
    mapping(id, code, long_url, Some(Utc::now() - TimeDelta::hours(1)))
}
