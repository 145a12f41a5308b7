//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_format;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Request Flow
///
/// 1. Reject codes that cannot have been generated (no store lookup)
/// 2. Resolve the code; the hit counter is incremented atomically
/// 3. Return 302 Found with the long URL in `Location`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the mapping has expired.
/// Returns 500 if the stored URL is not a valid header value.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_format(&code) {
        return Err(AppError::not_found(
            "Short URL not found",
            json!({ "code": code }),
        ));
    }

    let mapping = state.mapping_service.resolve(&code).await?;

    let location = HeaderValue::try_from(mapping.long_url.as_str()).map_err(|_| {
        AppError::internal(
            "Stored URL cannot be used as a redirect target",
            json!({ "code": code }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
