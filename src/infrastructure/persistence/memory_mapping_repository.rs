//! In-memory implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::{AppError, CODE_UNIQUE_CONSTRAINT};

/// Process-local mapping store backed by a [`DashMap`] keyed by code.
///
/// Per-code operations (insert, hit counting, delete) lock a single shard, so
/// they are atomic with respect to each other. Lookups by long URL scan the
/// whole map. Contents are lost when the process exits.
#[derive(Debug)]
pub struct InMemoryMappingRepository {
    storage: DashMap<String, Mapping>,
    next_id: AtomicI64,
}

impl InMemoryMappingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Stores a mapping verbatim, replacing any row with the same code.
    ///
    /// Lets callers seed rows with arbitrary `created_at`, `expires_at` or
    /// `hit_count` values.
    pub fn insert_raw(&self, mapping: Mapping) {
        self.next_id.fetch_max(mapping.id + 1, Ordering::Relaxed);
        self.storage.insert(mapping.code.clone(), mapping);
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for InMemoryMappingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        match self.storage.entry(new_mapping.code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": CODE_UNIQUE_CONSTRAINT }),
            )),
            Entry::Vacant(slot) => {
                let mapping = Mapping::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed),
                    new_mapping.code,
                    new_mapping.long_url,
                    Utc::now(),
                    new_mapping.expires_at,
                    0,
                );
                slot.insert(mapping.clone());
                Ok(mapping)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Mapping>, AppError> {
        let found = self
            .storage
            .iter()
            .filter(|entry| entry.long_url == long_url)
            .max_by_key(|entry| (entry.expires_at.is_none(), entry.expires_at, entry.id))
            .map(|entry| entry.value().clone());

        Ok(found)
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.storage.contains_key(code))
    }

    async fn record_hit(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Mapping>, AppError> {
        let Some(mut entry) = self.storage.get_mut(code) else {
            return Ok(None);
        };

        if entry.is_expired_at(now) {
            return Ok(None);
        }

        entry.hit_count += 1;
        Ok(Some(entry.value().clone()))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.storage.remove(code).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut removed = 0;
        self.storage.retain(|_, mapping| {
            let expired = mapping.is_expired_at(now);
            if expired {
                removed += 1;
            }
            !expired
        });

        Ok(removed)
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let count = self
            .storage
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        Ok(count as u64)
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.storage.len() as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
