//! Mapping entity representing a shortened URL.

use chrono::{DateTime, Utc};

/// A short code bound to a long URL.
///
/// `code` and `created_at` never change after insertion. The only mutation a
/// mapping ever sees is the hit counter moving up by one per successful
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub hit_count: u64,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        hit_count: u64,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            created_at,
            expires_at,
            hit_count,
        }
    }

    /// Returns true if the expiry lies strictly before `now`.
    ///
    /// A mapping without expiry is never expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Returns true if the mapping has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Opposite of [`Self::is_expired_at`].
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now)
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub code: String,
    pub long_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
