//! Record store port.

use std::collections::HashSet;

use async_trait::async_trait;

use super::item::{CatalogItem, ItemRecord};
use crate::assets::AssetRef;
use crate::error::CoreError;
use crate::types::DbId;

/// Result of a version-guarded [`CatalogRepository::replace`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReplaceOutcome {
    Replaced(CatalogItem),
    NotFound,
    /// The stored version no longer matches the one the caller loaded.
    VersionMismatch,
}

/// Atomic single-record CRUD over catalog items.
///
/// Every write replaces the whole record in one statement: readers see all
/// of a write or none of it. Store outages surface as
/// [`CoreError::StorageFailure`].
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create(&self, record: &ItemRecord) -> Result<CatalogItem, CoreError>;

    async fn get(&self, id: DbId) -> Result<Option<CatalogItem>, CoreError>;

    /// All items, newest first.
    async fn list(&self) -> Result<Vec<CatalogItem>, CoreError>;

    /// Overwrite every field of item `id` if its version is still `expected_version`.
    async fn replace(
        &self,
        id: DbId,
        expected_version: i64,
        record: &ItemRecord,
    ) -> Result<ReplaceOutcome, CoreError>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;

    /// Every asset reference held by any record.
    async fn referenced_assets(&self) -> Result<HashSet<AssetRef>, CoreError>;

    async fn is_asset_referenced(&self, asset_ref: &AssetRef) -> Result<bool, CoreError>;
}
