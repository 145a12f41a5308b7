//! Repository trait for short-link mapping storage.

use crate::domain::entities::{Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store for [`Mapping`] records, keyed by code with a secondary lookup by
/// long URL.
///
/// Every method is a single atomic unit of work against the store. Code
/// uniqueness is enforced by the store itself on [`Self::create`]; the
/// existence checks callers do beforehand are an optimization only.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// Connectivity and transaction failures surface as
/// [`AppError::StorageUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping with `hit_count = 0`.
    ///
    /// The store assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, AppError>;

    /// Finds a mapping by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError>;

    /// Finds a mapping by its long URL.
    ///
    /// When several rows share the URL, a live one is preferred. Returning an
    /// expired row is allowed; callers re-check expiry.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Mapping>, AppError>;

    /// Checks whether a code is currently stored.
    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically increments the hit counter of a mapping that is still live
    /// at `now` and returns the updated record.
    ///
    /// Returns `Ok(None)` if the code is gone or has expired in the meantime.
    async fn record_hit(&self, code: &str, now: DateTime<Utc>)
    -> Result<Option<Mapping>, AppError>;

    /// Deletes a mapping by code.
    ///
    /// Returns `Ok(true)` if a row was removed.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Deletes every mapping whose `expires_at` is strictly before `now`.
    ///
    /// Returns the number of removed rows.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts mappings whose `expires_at` is strictly before `now`.
    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts all stored mappings, live or not.
    async fn count(&self) -> Result<u64, AppError>;

    /// Checks that the store is reachable without touching mapping rows.
    async fn ping(&self) -> Result<(), AppError>;
}
