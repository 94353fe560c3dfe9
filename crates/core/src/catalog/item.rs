//! Catalog item entity and write payloads.

use serde::Serialize;

use crate::assets::AssetRef;
use crate::types::{DbId, Timestamp};

/// Entity name used in `NotFound` errors.
pub const ITEM_ENTITY: &str = "CatalogItem";

/// A committed catalog record.
///
/// Invariant: when `asset_ref` is `Some`, the referenced asset exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: DbId,
    pub name: String,
    pub price: f64,
    /// Pre-discount price; `None` when the item is not discounted.
    pub original_price: Option<f64>,
    pub category: String,
    pub stock: i32,
    pub description: String,
    pub in_stock: bool,
    pub is_new_item: bool,
    pub is_sale: bool,
    pub asset_ref: Option<AssetRef>,
    /// Optimistic concurrency token, bumped on every replace.
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CatalogItem {
    /// The caller-editable fields of this record.
    pub fn payload(&self) -> ItemPayload {
        ItemPayload {
            name: self.name.clone(),
            price: self.price,
            original_price: self.original_price,
            category: self.category.clone(),
            stock: self.stock,
            description: self.description.clone(),
            in_stock: self.in_stock,
            is_new_item: self.is_new_item,
            is_sale: self.is_sale,
        }
    }
}

/// Validated item fields, as produced by [`super::normalize::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPayload {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category: String,
    pub stock: i32,
    pub description: String,
    pub in_stock: bool,
    pub is_new_item: bool,
    pub is_sale: bool,
}

/// Everything a repository writes for one record, in a single atomic write.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub payload: ItemPayload,
    pub asset_ref: Option<AssetRef>,
}
