use chrono::{TimeDelta, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use url_shortener::domain::entities::NewMapping;
use url_shortener::domain::repositories::MappingRepository;
use url_shortener::infrastructure::persistence::PgMappingRepository;

fn new_mapping(code: &str, long_url: &str, expires_in: Option<TimeDelta>) -> NewMapping {
    NewMapping {
        code: code.to_string(),
        long_url: long_url.to_string(),
        expires_at: expires_in.map(|delta| Utc::now() + delta),
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_create_mapping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    let mapping = repo
        .create(new_mapping("abc123", "https://example.com", Some(TimeDelta::days(30))))
        .await
        .unwrap();

    assert!(mapping.id > 0);
    assert_eq!(mapping.code, "abc123");
    assert_eq!(mapping.long_url, "https://example.com");
    assert_eq!(mapping.hit_count, 0);
    assert!(mapping.expires_at.is_some());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_create_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    repo.create(new_mapping("dup123", "https://example.com/1", None))
        .await
        .unwrap();
    let err = repo
        .create(new_mapping("dup123", "https://example.com/2", None))
        .await
        .unwrap_err();

    assert!(err.is_code_conflict());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_find_by_code(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.create(new_mapping("find01", "https://example.com", None))
        .await
        .unwrap();

    let found = repo.find_by_code("find01").await.unwrap();
    let missing = repo.find_by_code("nope00").await.unwrap();

    assert_eq!(found.unwrap().long_url, "https://example.com");
    assert!(missing.is_none());
    assert!(repo.exists_by_code("find01").await.unwrap());
    assert!(!repo.exists_by_code("nope00").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_find_by_long_url_prefers_live_row(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    let url = "https://example.com/shared";

    repo.create(new_mapping("stale1", url, Some(-TimeDelta::hours(1))))
        .await
        .unwrap();
    repo.create(new_mapping("fresh1", url, Some(TimeDelta::days(1))))
        .await
        .unwrap();

    let found = repo.find_by_long_url(url).await.unwrap().unwrap();

    assert_eq!(found.code, "fresh1");
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_record_hit_increments(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.create(new_mapping("hits01", "https://example.com", Some(TimeDelta::days(1))))
        .await
        .unwrap();

    repo.record_hit("hits01", Utc::now()).await.unwrap();
    let updated = repo.record_hit("hits01", Utc::now()).await.unwrap().unwrap();

    assert_eq!(updated.hit_count, 2);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_record_hit_skips_expired(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.create(new_mapping("exp001", "https://example.com", Some(-TimeDelta::hours(1))))
        .await
        .unwrap();

    let result = repo.record_hit("exp001", Utc::now()).await.unwrap();
    let stored = repo.find_by_code("exp001").await.unwrap().unwrap();

    assert!(result.is_none());
    assert_eq!(stored.hit_count, 0);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_concurrent_hits_are_not_lost(pool: PgPool) {
    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool)));
    repo.create(new_mapping("race01", "https://example.com", None))
        .await
        .unwrap();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.record_hit("race01", Utc::now()).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = repo.find_by_code("race01").await.unwrap().unwrap();
    assert_eq!(stored.hit_count, 20);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_delete(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.create(new_mapping("del001", "https://example.com", None))
        .await
        .unwrap();

    assert!(repo.delete("del001").await.unwrap());
    assert!(!repo.delete("del001").await.unwrap());
    assert!(repo.find_by_code("del001").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_delete_expired(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));
    repo.create(new_mapping("old001", "https://example.com/1", Some(-TimeDelta::days(1))))
        .await
        .unwrap();
    repo.create(new_mapping("old002", "https://example.com/2", Some(-TimeDelta::hours(1))))
        .await
        .unwrap();
    repo.create(new_mapping("live01", "https://example.com/3", Some(TimeDelta::days(1))))
        .await
        .unwrap();
    repo.create(new_mapping("perm01", "https://example.com/4", None))
        .await
        .unwrap();

    let now = Utc::now();
    assert_eq!(repo.count_expired(now).await.unwrap(), 2);
    assert_eq!(repo.delete_expired(now).await.unwrap(), 2);
    assert_eq!(repo.delete_expired(now).await.unwrap(), 0);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_ping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
