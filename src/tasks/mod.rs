//! Recurring background jobs.
//!
//! Call `spawn_all` once during startup; tasks are detached with `tokio::spawn`
//! and run for the lifetime of the process.

use crate::config::TasksConfig;
use crate::services::FeatureService;
use std::time::Duration;

pub fn spawn_all(config: &TasksConfig, feature_service: FeatureService) {
    let interval = Duration::from_secs(config.feature_expiry_interval_secs.max(1));

    // purchased features past their end date
    tokio::spawn(async move {
        loop {
            match feature_service.expire_due().await {
                Ok(count) if count.processed_count > 0 => {
                    log::info!("Expired purchased features processed: {}", count.processed_count)
                }
                Ok(_) => {}
                Err(e) => log::error!("Failed to expire purchased features: {e:?}"),
            }
            tokio::time::sleep(interval).await;
        }
    });
}
