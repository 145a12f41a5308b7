mod common;

use axum::http::StatusCode;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};
use url_shortener::domain::repositories::MappingRepository;

#[tokio::test]
async fn test_create_returns_created() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/a" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(body["shortUrl"], format!("{}/r/{}", common::BASE_URL, code));

    let stored = repo.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(stored.long_url, "https://example.com/a");
    assert_eq!(stored.hit_count, 0);
}

#[tokio::test]
async fn test_create_reuses_live_mapping() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let first = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/same" }))
        .await;
    first.assert_status(StatusCode::CREATED);

    let second = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/same", "expiryDays": 90 }))
        .await;
    second.assert_status_ok();

    let first: Value = first.json();
    let second: Value = second.json();
    assert_eq!(first["code"], second["code"]);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_create_replaces_expired_mapping() {
    let (state, repo) = common::create_test_state();
    repo.insert_raw(common::expired_mapping(
        1,
        "old123",
        "https://example.com/stale",
    ));
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/stale" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_ne!(body["code"], "old123");
    assert!(repo.find_by_code("old123").await.unwrap().is_none());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_create_applies_expiry_override() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let body: Value = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/week", "expiryDays": 7 }))
        .await
        .json();

    let stored = repo
        .find_by_code(body["code"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    let lifetime = stored.expires_at.unwrap() - stored.created_at;

    assert!((lifetime - TimeDelta::days(7)).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_create_non_positive_expiry_uses_default() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let body: Value = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/default", "expiryDays": 0 }))
        .await
        .json();

    let stored = repo
        .find_by_code(body["code"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    let lifetime = stored.expires_at.unwrap() - stored.created_at;

    assert!((lifetime - TimeDelta::days(30)).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_create_accepts_ftp() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "ftp://files.example.com/archive.zip" }))
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let payloads = [
        json!({}),
        json!({ "longUrl": "" }),
        json!({ "longUrl": "   " }),
        json!({ "longUrl": "not a url" }),
        json!({ "longUrl": "mailto:someone@example.com" }),
        json!({ "longUrl": format!("https://example.com/{}", "a".repeat(2048)) }),
        json!({ "longUrl": "https://example.com", "expiryDays": 3651 }),
        json!({ "longUrl": "https://example.com/a\nb" }),
        json!({ "longUrl": "https://example.com/a\tb" }),
        json!({ "longUrl": 42 }),
        json!({ "longUrl": "https://example.com", "expiryDays": "7" }),
    ];

    for payload in payloads {
        let response = server.post("/api/urls").json(&payload).await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "validation_error", "{}", payload);
    }

    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_create_is_rate_limited() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server_with_limits(state, 1, 2);

    for i in 0..2 {
        server
            .post("/api/urls")
            .json(&json!({ "longUrl": format!("https://example.com/{}", i) }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/third" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_lookups_are_not_rate_limited() {
    let (state, repo) = common::create_test_state();
    repo.insert_raw(common::live_mapping(1, "look01", "https://example.com/x"));
    let server = common::test_server_with_limits(state, 1, 1);

    for _ in 0..5 {
        server.get("/api/urls/look01").await.assert_status_ok();
    }
}

#[tokio::test]
async fn test_metadata_success() {
    let (state, repo) = common::create_test_state();
    let mut mapping = common::live_mapping(1, "meta01", "https://example.com/meta");
    mapping.hit_count = 4;
    repo.insert_raw(mapping.clone());
    let server = common::test_server(state);

    let response = server.get("/api/urls/meta01").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "meta01");
    assert_eq!(body["longUrl"], "https://example.com/meta");
    assert_eq!(body["shortUrl"], format!("{}/r/meta01", common::BASE_URL));
    assert_eq!(body["hitCount"], 4);
    assert_eq!(body["expired"], false);

    let expires_at: DateTime<Utc> = body["expiresAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(Some(expires_at), mapping.expires_at);
}

#[tokio::test]
async fn test_metadata_does_not_count_hits() {
    let (state, repo) = common::create_test_state();
    repo.insert_raw(common::live_mapping(1, "meta02", "https://example.com/m"));
    let server = common::test_server(state);

    for _ in 0..3 {
        server.get("/api/urls/meta02").await.assert_status_ok();
    }

    let stored = repo.find_by_code("meta02").await.unwrap().unwrap();
    assert_eq!(stored.hit_count, 0);
}

#[tokio::test]
async fn test_metadata_reports_expired_mapping() {
    let (state, repo) = common::create_test_state();
    repo.insert_raw(common::expired_mapping(1, "gone01", "https://example.com/g"));
    let server = common::test_server(state);

    let response = server.get("/api/urls/gone01").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["expired"], true);
}

#[tokio::test]
async fn test_metadata_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server.get("/api/urls/nope42").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_metadata_malformed_code_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server(state);

    server.get("/api/urls/ab").await.assert_status_not_found();
    server
        .get("/api/urls/waytoolongcode")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_create_rejects_malformed_json_with_error_envelope() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/urls")
        .content_type("application/json")
        .text("{\"longUrl\": ")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_create_stores_canonical_url() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let first = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "HTTPS://Example.COM:443/Path" }))
        .await;
    first.assert_status(StatusCode::CREATED);

    let second = server
        .post("/api/urls")
        .json(&json!({ "longUrl": "https://example.com/Path" }))
        .await;
    second.assert_status_ok();

    let first: Value = first.json();
    let second: Value = second.json();
    assert_eq!(first["code"], second["code"]);

    let stored = repo
        .find_by_code(first["code"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.long_url, "https://example.com/Path");
}
