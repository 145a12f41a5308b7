//! DTOs for the short-URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::services::MappingMetadata;
use crate::utils::url_normalizer::normalize_url;

/// Longest accepted long URL, in characters.
pub const MAX_LONG_URL_LENGTH: u64 = 2048;

/// Longest accepted lifetime override, in days.
pub const MAX_EXPIRY_DAYS: i64 = 3650;

/// Request to shorten a URL.
///
/// ```json
/// { "longUrl": "https://example.com/a", "expiryDays": 7 }
/// ```
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    /// Absolute `http`, `https` or `ftp` URL.
    #[serde(default)]
    #[validate(
        length(min = 1, max = 2048, message = "URL must be 1-2048 characters"),
        url(message = "Invalid URL format"),
        custom(function = "validate_scheme")
    )]
    pub long_url: String,

    /// Lifetime in days; absent or non-positive means the configured default.
    #[validate(range(max = 3650, message = "expiryDays must be at most 3650"))]
    pub expiry_days: Option<i64>,
}

impl CreateUrlRequest {
    /// The long URL in the canonical form that gets stored.
    ///
    /// Only meaningful after [`Validate::validate`] succeeded; returns `None`
    /// otherwise.
    pub fn normalized_long_url(&self) -> Option<String> {
        normalize_url(&self.long_url).ok()
    }
}

/// Accepts only `http`, `https` and `ftp` URLs that name a host and carry no
/// whitespace or control characters.
fn validate_scheme(value: &str) -> Result<(), ValidationError> {
    normalize_url(value).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("long_url");
        error.message = Some(e.to_string().into());
        error
    })
}

/// Response for a created or reused short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub code: String,
    pub short_url: String,
}

/// Diagnostic view of a short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetadataResponse {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub hit_count: u64,
    pub expired: bool,
}

impl UrlMetadataResponse {
    pub fn new(metadata: MappingMetadata, short_url: String) -> Self {
        let MappingMetadata { mapping, expired } = metadata;

        Self {
            code: mapping.code,
            long_url: mapping.long_url,
            short_url,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
            hit_count: mapping.hit_count,
            expired,
        }
    }
}
