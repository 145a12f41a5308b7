//! Mapping lifecycle service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;

/// Tunables consumed by [`MappingService`].
#[derive(Debug, Clone)]
pub struct MappingSettings {
    /// Length of freshly generated codes.
    pub code_length: usize,
    /// Lifetime of a mapping when the caller gives no positive override.
    pub default_expiry_days: i64,
    /// Attempts at `code_length` before the single escalation attempt.
    pub max_retries: u32,
    /// Prefix for fully-qualified short links, e.g. `https://s.example.com`.
    pub base_url: String,
    /// Upper bound for every individual store call.
    pub store_timeout: Duration,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            code_length: 6,
            default_expiry_days: 30,
            max_retries: 3,
            base_url: "http://localhost:3000".to_string(),
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of [`MappingService::create_short_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new mapping was stored.
    Created(Mapping),
    /// A live mapping for the same long URL already existed and was returned as-is.
    Reused(Mapping),
}

impl CreateOutcome {
    pub fn mapping(&self) -> &Mapping {
        match self {
            CreateOutcome::Created(mapping) | CreateOutcome::Reused(mapping) => mapping,
        }
    }

    pub fn into_mapping(self) -> Mapping {
        match self {
            CreateOutcome::Created(mapping) | CreateOutcome::Reused(mapping) => mapping,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

/// Diagnostic view of a mapping, returned even after expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingMetadata {
    pub mapping: Mapping,
    /// Expiry evaluated at lookup time.
    pub expired: bool,
}

/// Service managing the lifecycle of short-link mappings.
///
/// Holds no locks of its own; every operation is a short sequence of atomic
/// store calls, so the service is safe to share across request tasks.
///
/// # Concurrency
///
/// Two concurrent creates for a never-seen URL may both insert, leaving two
/// live mappings for the same URL. Code uniqueness still holds because the
/// store rejects duplicate codes on insert, which is treated as a collision.
pub struct MappingService<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    settings: MappingSettings,
}

impl<R: MappingRepository + ?Sized> MappingService<R> {
    /// Creates a new mapping service.
    pub fn new(repository: Arc<R>, settings: MappingSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> &MappingSettings {
        &self.settings
    }

    /// Returns a short link for `long_url`, reusing a live mapping if one exists.
    ///
    /// # Flow
    ///
    /// 1. Live mapping for the URL exists: returned unchanged, nothing is written
    /// 2. Expired mapping for the URL exists: deleted, then replaced
    /// 3. A unique code is generated and a mapping expiring in
    ///    `expiry_days_override` days (when positive) or
    ///    [`MappingSettings::default_expiry_days`] is stored
    ///
    /// `long_url` is expected to be an already validated absolute URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the expiry falls outside the timestamp range
    /// - [`AppError::CodeSpaceExhausted`] if every candidate code collided
    /// - [`AppError::StorageUnavailable`] on store failure or timeout
    pub async fn create_short_url(
        &self,
        long_url: &str,
        expiry_days_override: Option<i64>,
    ) -> Result<CreateOutcome, AppError> {
        let now = Utc::now();
        let expires_at = self.compute_expiry(now, expiry_days_override)?;

        if let Some(existing) = self
            .store(self.repository.find_by_long_url(long_url))
            .await?
        {
            if existing.is_live_at(now) {
                debug!(code = %existing.code, "Reusing live mapping for {}", long_url);
                return Ok(CreateOutcome::Reused(existing));
            }

            info!(code = %existing.code, "Replacing expired mapping for {}", long_url);
            self.store(self.repository.delete(&existing.code)).await?;
        }

        let mapping = self
            .insert_with_unique_code(long_url, Some(expires_at))
            .await?;

        metrics::counter!("shortener_mappings_created_total").increment(1);
        info!("Created short URL: {} -> {}", mapping.code, mapping.long_url);

        Ok(CreateOutcome::Created(mapping))
    }

    /// Resolves a code for redirection and counts the hit.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is unknown (or deleted mid-resolve)
    /// - [`AppError::Expired`] if the mapping is past its expiry; the hit
    ///   counter is left untouched and the row is left for cleanup
    /// - [`AppError::StorageUnavailable`] on store failure or timeout
    pub async fn resolve(&self, code: &str) -> Result<Mapping, AppError> {
        let now = Utc::now();

        let mapping = self
            .store(self.repository.find_by_code(code))
            .await?
            .ok_or_else(|| not_found(code))?;

        if mapping.is_expired_at(now) {
            return Err(AppError::expired(
                "Short URL has expired",
                json!({ "code": code, "expires_at": mapping.expires_at }),
            ));
        }

        let mapping = self
            .store(self.repository.record_hit(code, now))
            .await?
            .ok_or_else(|| not_found(code))?;

        metrics::counter!("shortener_redirects_total").increment(1);
        debug!("Redirecting: {} -> {}", code, mapping.long_url);

        Ok(mapping)
    }

    /// Looks up a mapping without touching its hit counter.
    ///
    /// Expired mappings are returned with `expired: true` instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn get_metadata(&self, code: &str) -> Result<MappingMetadata, AppError> {
        let mapping = self
            .store(self.repository.find_by_code(code))
            .await?
            .ok_or_else(|| not_found(code))?;

        let expired = mapping.is_expired();

        Ok(MappingMetadata { mapping, expired })
    }

    /// Deletes every mapping whose expiry lies strictly before `now`.
    ///
    /// Idempotent: a second pass with no new expirations removes nothing.
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let removed = self
            .store(self.repository.delete_expired(now))
            .await?;

        if removed > 0 {
            metrics::counter!("shortener_mappings_expired_total").increment(removed);
            info!("Cleaned up {} expired mappings", removed);
        } else {
            debug!("No expired mappings to clean up");
        }

        Ok(removed)
    }

    /// Counts mappings a cleanup pass at `now` would remove.
    pub async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.store(self.repository.count_expired(now)).await
    }

    /// Counts all stored mappings.
    pub async fn count(&self) -> Result<u64, AppError> {
        self.store(self.repository.count()).await
    }

    /// Checks store connectivity, bounded by the store timeout.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.store(self.repository.ping()).await
    }

    /// Constructs the fully-qualified short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    fn compute_expiry(
        &self,
        now: DateTime<Utc>,
        expiry_days_override: Option<i64>,
    ) -> Result<DateTime<Utc>, AppError> {
        let days = expiry_days_override
            .filter(|days| *days > 0)
            .unwrap_or(self.settings.default_expiry_days);

        TimeDelta::try_days(days)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| {
                AppError::bad_request(
                    "Expiry is out of range",
                    json!({ "expiry_days": days }),
                )
            })
    }

    /// Inserts a mapping under a freshly generated code.
    ///
    /// Tries `max_retries` codes of the configured length, then exactly one
    /// code one character longer. A candidate collides when the store already
    /// has it or rejects the insert on the code's unique constraint.
    async fn insert_with_unique_code(
        &self,
        long_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Mapping, AppError> {
        let length = self.settings.code_length;
        let candidates = std::iter::repeat_n(length, self.settings.max_retries as usize)
            .chain(std::iter::once(length + 1));

        for (attempt, candidate_length) in candidates.enumerate() {
            let code = generate_code(candidate_length);

            if self.store(self.repository.exists_by_code(&code)).await? {
                warn!(
                    "Code collision detected for code: {}, attempt: {}",
                    code,
                    attempt + 1
                );
                continue;
            }

            let new_mapping = NewMapping {
                code,
                long_url: long_url.to_string(),
                expires_at,
            };

            match self.store(self.repository.create(new_mapping)).await {
                Ok(mapping) => return Ok(mapping),
                Err(e) if e.is_code_conflict() => {
                    warn!(
                        "Code taken concurrently on insert, attempt: {}",
                        attempt + 1
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::code_space_exhausted(
            "Failed to generate unique code",
            json!({
                "code_length": length,
                "attempts": self.settings.max_retries + 1,
            }),
        ))
    }

    /// Bounds a store call by [`MappingSettings::store_timeout`].
    async fn store<T>(
        &self,
        operation: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        let timeout = self.settings.store_timeout;

        tokio::time::timeout(timeout, operation)
            .await
            .map_err(|_| {
                warn!("Store call exceeded {:?}", timeout);
                AppError::storage_unavailable(
                    "Storage operation timed out",
                    json!({ "timeout_ms": timeout.as_millis() as u64 }),
                )
            })?
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "code": code }))
}
