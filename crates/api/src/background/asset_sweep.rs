//! Periodic reclamation of orphaned assets.
//!
//! Runs [`CatalogService::reconcile`] on a fixed interval using
//! `tokio::time::interval`. The first pass runs immediately at startup so
//! orphans left by a crash are reclaimed without waiting a full interval.

use std::time::Duration;

use storefront_core::catalog::CatalogService;
use tokio_util::sync::CancellationToken;

/// Run the asset sweep loop until `cancel` is triggered.
pub async fn run(
    catalog: CatalogService,
    interval: Duration,
    grace: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        grace_secs = grace.as_secs(),
        "Asset sweep job started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Asset sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                match catalog.reconcile(grace).await {
                    Ok(report) if report.has_errors() => {
                        tracing::warn!(
                            orphans_removed = report.orphans_removed,
                            errors = report.errors.len(),
                            "Asset sweep: finished with errors"
                        );
                    }
                    Ok(report) if report.orphans_removed > 0 => {
                        tracing::info!(
                            orphans_removed = report.orphans_removed,
                            bytes_reclaimed = report.bytes_reclaimed,
                            "Asset sweep: reclaimed orphans"
                        );
                    }
                    Ok(_) => {
                        tracing::debug!("Asset sweep: no orphans");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Asset sweep: pass failed");
                    }
                }
            }
        }
    }
}
