//! Handlers for creating and inspecting short URLs.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::urls::{CreateUrlRequest, CreateUrlResponse, UrlMetadataResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_format;

/// Creates a short URL, or returns the live one already assigned to the URL.
///
/// The URL is stored in canonical form (lowercase scheme and host, default
/// port dropped, non-ASCII percent-encoded), so spelling variants of the same
/// URL share one mapping.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/a", "expiryDays": 7 }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: a new mapping was stored
/// - **200 OK**: a live mapping for the same URL was reused
///
/// # Errors
///
/// - 400 if the body is not valid JSON of the expected shape, the URL is
///   malformed, or `expiryDays` is out of range
/// - 429 if the client exceeded its creation rate
/// - 503 if no unique code could be found
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let long_url = payload.normalized_long_url().ok_or_else(|| {
        AppError::bad_request("Invalid URL format", json!({ "longUrl": payload.long_url }))
    })?;

    let outcome = state
        .mapping_service
        .create_short_url(&long_url, payload.expiry_days)
        .await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let mapping = outcome.into_mapping();
    let short_url = state.mapping_service.short_url(&mapping.code);

    Ok((
        status,
        Json(CreateUrlResponse {
            code: mapping.code,
            short_url,
        }),
    ))
}

/// Returns diagnostic metadata for a short code without counting a hit.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
///
/// Expired mappings that have not been cleaned up yet are reported with
/// `"expired": true`.
///
/// # Errors
///
/// Returns 404 if the code is unknown or not a well-formed code.
pub async fn url_metadata_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlMetadataResponse>, AppError> {
    if !is_valid_format(&code) {
        return Err(AppError::not_found(
            "Short URL not found",
            json!({ "code": code }),
        ));
    }

    let metadata = state.mapping_service.get_metadata(&code).await?;
    let short_url = state.mapping_service.short_url(&metadata.mapping.code);

    Ok(Json(UrlMetadataResponse::new(metadata, short_url)))
}
