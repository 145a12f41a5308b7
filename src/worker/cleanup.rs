//! Scheduled removal of expired mappings.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::application::services::MappingService;
use crate::domain::repositories::MappingRepository;

/// Runs a cleanup pass every `interval` until the task is aborted.
///
/// The first pass happens one full interval after start. A failed pass is
/// logged and retried on the next tick.
pub async fn run_cleanup_worker<R>(service: Arc<MappingService<R>>, interval: Duration)
where
    R: MappingRepository + ?Sized,
{
    info!("Cleanup worker running every {:?}", interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // interval() completes its first tick immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if let Err(e) = service.cleanup_expired(Utc::now()).await {
            error!("Cleanup pass failed: {}", e);
        }
    }
}
