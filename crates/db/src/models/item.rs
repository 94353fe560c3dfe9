//! Catalog item row model.

use sqlx::FromRow;
use storefront_core::assets::AssetRef;
use storefront_core::catalog::CatalogItem;
use storefront_core::types::{DbId, Timestamp};

/// A row from the `catalog_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogItemRow {
    pub id: DbId,
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category: String,
    pub stock: i32,
    pub description: String,
    pub in_stock: bool,
    pub is_new_item: bool,
    pub is_sale: bool,
    pub asset_ref: Option<String>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CatalogItemRow> for CatalogItem {
    fn from(row: CatalogItemRow) -> Self {
        CatalogItem {
            id: row.id,
            name: row.name,
            price: row.price,
            original_price: row.original_price,
            category: row.category,
            stock: row.stock,
            description: row.description,
            in_stock: row.in_stock,
            is_new_item: row.is_new_item,
            is_sale: row.is_sale,
            asset_ref: row.asset_ref.map(AssetRef::from),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
