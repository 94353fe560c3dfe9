//! In-process record store.
//!
//! Backs the test suites and local runs without PostgreSQL. Each operation
//! runs under one lock, which gives the same whole-record atomicity the
//! database provides.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::item::{CatalogItem, ItemRecord};
use super::repository::{CatalogRepository, ReplaceOutcome};
use crate::assets::AssetRef;
use crate::error::CoreError;
use crate::types::DbId;

#[derive(Default)]
struct MemoryState {
    next_id: DbId,
    items: BTreeMap<DbId, CatalogItem>,
}

/// [`CatalogRepository`] over a map guarded by an async `RwLock`.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply(item: &mut CatalogItem, record: &ItemRecord) {
    let p = &record.payload;
    item.name = p.name.clone();
    item.price = p.price;
    item.original_price = p.original_price;
    item.category = p.category.clone();
    item.stock = p.stock;
    item.description = p.description.clone();
    item.in_stock = p.in_stock;
    item.is_new_item = p.is_new_item;
    item.is_sale = p.is_sale;
    item.asset_ref = record.asset_ref.clone();
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn create(&self, record: &ItemRecord) -> Result<CatalogItem, CoreError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let now = chrono::Utc::now();
        let mut item = CatalogItem {
            id: state.next_id,
            name: String::new(),
            price: 0.0,
            original_price: None,
            category: String::new(),
            stock: 0,
            description: String::new(),
            in_stock: false,
            is_new_item: false,
            is_sale: false,
            asset_ref: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        apply(&mut item, record);
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, id: DbId) -> Result<Option<CatalogItem>, CoreError> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<CatalogItem>, CoreError> {
        Ok(self.state.read().await.items.values().rev().cloned().collect())
    }

    async fn replace(
        &self,
        id: DbId,
        expected_version: i64,
        record: &ItemRecord,
    ) -> Result<ReplaceOutcome, CoreError> {
        let mut state = self.state.write().await;
        let Some(item) = state.items.get_mut(&id) else {
            return Ok(ReplaceOutcome::NotFound);
        };
        if item.version != expected_version {
            return Ok(ReplaceOutcome::VersionMismatch);
        }
        apply(item, record);
        item.version += 1;
        item.updated_at = chrono::Utc::now();
        Ok(ReplaceOutcome::Replaced(item.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.state.write().await.items.remove(&id).is_some())
    }

    async fn referenced_assets(&self) -> Result<HashSet<AssetRef>, CoreError> {
        Ok(self
            .state
            .read()
            .await
            .items
            .values()
            .filter_map(|item| item.asset_ref.clone())
            .collect())
    }

    async fn is_asset_referenced(&self, asset_ref: &AssetRef) -> Result<bool, CoreError> {
        Ok(self
            .state
            .read()
            .await
            .items
            .values()
            .any(|item| item.asset_ref.as_ref() == Some(asset_ref)))
    }
}
