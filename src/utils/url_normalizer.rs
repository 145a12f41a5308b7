//! Long URL sanitization and canonicalization.
//!
//! Stored URLs end up verbatim in the `Location` header of redirects, so they
//! must be plain visible ASCII.

use url::Url;

/// Schemes a long URL may use.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Errors that can occur during URL normalization.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not contain whitespace or control characters")]
    ForbiddenCharacter,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must use http, https or ftp and name a host")]
    UnsupportedScheme,
}

/// Normalizes a long URL to the form that is stored and redirected to.
///
/// # Rules
///
/// 1. Whitespace and control characters anywhere in the input are rejected
///    (the parser would otherwise drop embedded tabs and newlines silently)
/// 2. Scheme must be `http`, `https` or `ftp`, with a non-empty host
/// 3. Scheme and host are lowercased, default ports removed, non-ASCII
///    characters percent-encoded
///
/// Query strings and fragments are kept.
///
/// # Examples
///
/// ```
/// use url_shortener::utils::url_normalizer::normalize_url;
///
/// assert_eq!(
///     normalize_url("HTTPS://Example.COM:443/Path?q=1").unwrap(),
///     "https://example.com/Path?q=1"
/// );
/// assert!(normalize_url("https://example.com/a\nb").is_err());
/// ```
pub fn normalize_url(raw: &str) -> Result<String, UrlNormalizationError> {
    if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlNormalizationError::ForbiddenCharacter);
    }

    let parsed =
        Url::parse(raw).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme())
        || parsed.host_str().is_none_or(str::is_empty)
    {
        return Err(UrlNormalizationError::UnsupportedScheme);
    }

    Ok(parsed.into())
}
