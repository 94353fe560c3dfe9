//! Record/asset lifecycle coordination.
//!
//! The record store decides which asset belongs to an item. Every
//! multi-step operation is ordered so that a committed record never points
//! at a missing asset:
//!
//! - **create**: stage asset -> insert record (compensate: remove staged asset)
//! - **update**: stage new asset -> replace record -> remove previous asset
//! - **delete**: delete record -> remove its asset
//!
//! A crash after a record commit but before the trailing removal leaves an
//! orphaned asset, which [`crate::reclamation::sweep_orphans`] reclaims.
//! Update and delete hold the item's [`ItemLocks`] slot throughout.
//!
//! Create and update hold the shared side of a staging gate from staging
//! until the record write and any compensation have finished; the sweep
//! holds the exclusive side. A staged asset whose record is still in flight
//! is therefore never seen by the sweep as an orphan, whatever the grace.
//!
//! Mutating operations run on a spawned task, so a caller that drops the
//! request future cannot interrupt staging, compensation or cleanup halfway.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use super::item::{CatalogItem, ItemPayload, ItemRecord, ITEM_ENTITY};
use super::locks::ItemLocks;
use super::normalize::{normalize, RawItemInput};
use super::repository::{CatalogRepository, ReplaceOutcome};
use crate::assets::{AssetRef, AssetStore, AssetUpload};
use crate::error::CoreError;
use crate::reclamation::{sweep_orphans, SweepReport};
use crate::types::DbId;

/// Default bound on waiting for an item's slot.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Catalog operations over an injected record store and asset store.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
    assets: Arc<dyn AssetStore>,
    locks: ItemLocks,
    lock_timeout: Duration,
    staging: Arc<RwLock<()>>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: ITEM_ENTITY,
        id,
    }
}

/// Run `fut` to completion on its own task, even if the caller goes away.
async fn run_detached<T, F>(fut: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| CoreError::Internal(format!("catalog task failed: {e}")))?
}

impl CatalogService {
    pub fn new(
        repo: Arc<dyn CatalogRepository>,
        assets: Arc<dyn AssetStore>,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            assets,
            locks: ItemLocks::new(),
            lock_timeout,
            staging: Arc::new(RwLock::new(())),
        }
    }

    pub fn assets(&self) -> &Arc<dyn AssetStore> {
        &self.assets
    }

    // ── Reads ─────────────────────────────────────────────────────────

    /// Lock-free read; observes either side of an in-flight write.
    pub async fn get(&self, id: DbId) -> Result<CatalogItem, CoreError> {
        self.repo.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<CatalogItem>, CoreError> {
        self.repo.list().await
    }

    // ── Writes ────────────────────────────────────────────────────────

    /// Create an item, optionally with an asset.
    ///
    /// Either both the record and its asset exist afterwards, or neither does.
    pub async fn create(
        &self,
        raw: RawItemInput,
        asset: Option<AssetUpload>,
    ) -> Result<CatalogItem, CoreError> {
        let payload = normalize(&raw)?;
        let this = self.clone();
        run_detached(async move { this.create_committed(payload, asset).await }).await
    }

    /// Replace every field of item `id`; a supplied asset replaces the old one.
    pub async fn update(
        &self,
        id: DbId,
        raw: RawItemInput,
        asset: Option<AssetUpload>,
    ) -> Result<CatalogItem, CoreError> {
        let payload = normalize(&raw)?;
        let this = self.clone();
        run_detached(async move { this.update_committed(id, payload, asset).await }).await
    }

    /// Delete item `id` and then its asset.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let this = self.clone();
        run_detached(async move { this.delete_committed(id).await }).await
    }

    /// Remove unreferenced assets older than `grace`.
    ///
    /// Waits for in-flight creates and updates to settle, and holds new ones
    /// back until the sweep has finished.
    pub async fn reconcile(&self, grace: Duration) -> Result<SweepReport, CoreError> {
        let _exclusive = self.staging.write().await;
        sweep_orphans(self.repo.as_ref(), self.assets.as_ref(), grace).await
    }

    // ── Steps ─────────────────────────────────────────────────────────

    async fn create_committed(
        &self,
        payload: ItemPayload,
        asset: Option<AssetUpload>,
    ) -> Result<CatalogItem, CoreError> {
        let _staging = self.staging.read().await;
        let staged = self.stage(asset.as_ref()).await?;
        let record = ItemRecord {
            payload,
            asset_ref: staged.clone(),
        };

        match self.repo.create(&record).await {
            Ok(item) => {
                tracing::info!(item_id = item.id, asset_ref = ?item.asset_ref, "Catalog item created");
                Ok(item)
            }
            Err(err) => {
                if let Some(staged) = &staged {
                    self.discard_staged(staged, &err).await;
                }
                Err(err)
            }
        }
    }

    async fn update_committed(
        &self,
        id: DbId,
        payload: ItemPayload,
        asset: Option<AssetUpload>,
    ) -> Result<CatalogItem, CoreError> {
        let _slot = self.locks.acquire(id, self.lock_timeout).await?;

        let current = self.repo.get(id).await?.ok_or_else(|| not_found(id))?;
        let _staging = self.staging.read().await;
        let staged = self.stage(asset.as_ref()).await?;
        let record = ItemRecord {
            payload,
            asset_ref: staged.clone().or_else(|| current.asset_ref.clone()),
        };

        let err = match self.repo.replace(id, current.version, &record).await {
            Ok(ReplaceOutcome::Replaced(item)) => {
                if staged.is_some() {
                    if let Some(previous) = &current.asset_ref {
                        self.remove_quietly(previous, "replaced").await;
                    }
                }
                tracing::info!(item_id = id, version = item.version, asset_ref = ?item.asset_ref, "Catalog item updated");
                return Ok(item);
            }
            Ok(ReplaceOutcome::NotFound) => not_found(id),
            Ok(ReplaceOutcome::VersionMismatch) => CoreError::Conflict(format!(
                "Item {id} was modified concurrently; retry with fresh data"
            )),
            Err(e) => e,
        };

        if let Some(staged) = &staged {
            self.discard_staged(staged, &err).await;
        }
        Err(err)
    }

    async fn delete_committed(&self, id: DbId) -> Result<(), CoreError> {
        let _slot = self.locks.acquire(id, self.lock_timeout).await?;

        let current = self.repo.get(id).await?.ok_or_else(|| not_found(id))?;
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(item_id = id, "Catalog item deleted");

        if let Some(asset_ref) = &current.asset_ref {
            self.remove_quietly(asset_ref, "deleted item's").await;
        }
        Ok(())
    }

    async fn stage(&self, asset: Option<&AssetUpload>) -> Result<Option<AssetRef>, CoreError> {
        let Some(upload) = asset else {
            return Ok(None);
        };
        let asset_ref = self
            .assets
            .stage(&upload.bytes, &upload.content_type, upload.file_name.as_deref())
            .await?;
        Ok(Some(asset_ref))
    }

    /// Undo a staging whose record write did not commit.
    ///
    /// A storage failure may hide a write that did commit, so the record
    /// store is asked first; an asset that is or may be referenced stays
    /// for the sweep to judge.
    async fn discard_staged(&self, staged: &AssetRef, cause: &CoreError) {
        if matches!(cause, CoreError::StorageFailure(_)) {
            match self.repo.is_asset_referenced(staged).await {
                Ok(false) => {}
                Ok(true) => {
                    tracing::warn!(asset_ref = %staged, "Record write reported failure but references the staged asset; keeping it");
                    return;
                }
                Err(e) => {
                    tracing::warn!(asset_ref = %staged, error = %e, "Cannot confirm staged asset is unreferenced; leaving it for the sweep");
                    return;
                }
            }
        }
        self.remove_quietly(staged, "staged").await;
    }

    /// Best-effort removal after the primary operation has been decided.
    async fn remove_quietly(&self, asset_ref: &AssetRef, role: &str) {
        if let Err(e) = self.assets.remove(asset_ref).await {
            tracing::warn!(asset_ref = %asset_ref, error = %e, "Failed to remove {role} asset; left for the sweep");
        }
    }
}
