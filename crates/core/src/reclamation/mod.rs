//! Orphaned asset reclamation.
//!
//! An asset becomes an orphan when the process stops between a record commit
//! and the removal of the asset that commit retired, or when a cleanup
//! removal fails. [`sweep_orphans`] diffs the asset store against the set of
//! references held by records and removes the difference.
//!
//! Listing happens before the referenced set is read, so an asset committed
//! mid-sweep is always seen as referenced. Callers must keep staging out
//! while the sweep runs; [`CatalogService::reconcile`] does so with its
//! staging gate. Assets younger than the grace period are spared as well,
//! which covers writers outside this process.
//!
//! [`CatalogService::reconcile`]: crate::catalog::CatalogService::reconcile

pub mod types;

use std::time::Duration;

use crate::assets::constraints::format_bytes;
use crate::assets::AssetStore;
use crate::catalog::repository::CatalogRepository;
use crate::error::CoreError;

pub use types::SweepReport;

/// Default minimum age before an unreferenced asset is considered orphaned.
pub const DEFAULT_SWEEP_GRACE: Duration = Duration::from_secs(3600);

/// Remove every stored asset that no record references and that is older than `grace`.
///
/// Individual removal failures are recorded in the report; the sweep keeps going.
pub async fn sweep_orphans(
    repo: &dyn CatalogRepository,
    assets: &dyn AssetStore,
    grace: Duration,
) -> Result<SweepReport, CoreError> {
    let started_at = chrono::Utc::now();
    let stored = assets.list().await?;
    let referenced = repo.referenced_assets().await?;

    let mut report = SweepReport {
        scanned: stored.len(),
        referenced: referenced.len(),
        started_at: Some(started_at),
        ..Default::default()
    };

    let now = chrono::Utc::now();
    for asset in stored {
        if referenced.contains(&asset.asset_ref) {
            continue;
        }
        // Negative age (clock skew) counts as recent.
        let recent = !grace.is_zero()
            && (now - asset.modified_at)
                .to_std()
                .map_or(true, |age| age < grace);
        if recent {
            report.skipped_recent += 1;
            continue;
        }
        match assets.remove(&asset.asset_ref).await {
            Ok(()) => {
                tracing::info!(asset_ref = %asset.asset_ref, size = asset.size_bytes, "Removed orphaned asset");
                report.orphans_removed += 1;
                report.bytes_reclaimed += asset.size_bytes;
            }
            Err(e) => {
                tracing::warn!(asset_ref = %asset.asset_ref, error = %e, "Failed to remove orphaned asset");
                report.errors.push(format!("{}: {e}", asset.asset_ref));
            }
        }
    }

    report.finished_at = Some(chrono::Utc::now());
    tracing::info!(
        scanned = report.scanned,
        referenced = report.referenced,
        removed = report.orphans_removed,
        skipped_recent = report.skipped_recent,
        errors = report.errors.len(),
        reclaimed = %format_bytes(report.bytes_reclaimed),
        "Asset sweep finished"
    );
    Ok(report)
}
