//! Repository for the `catalog_items` table.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use storefront_core::assets::AssetRef;
use storefront_core::catalog::{CatalogItem, CatalogRepository, ItemRecord, ReplaceOutcome};
use storefront_core::error::CoreError;
use storefront_core::types::DbId;

use crate::models::item::CatalogItemRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, price, original_price, category, stock, description, \
     in_stock, is_new_item, is_sale, asset_ref, version, created_at, updated_at";

/// Provides single-statement CRUD for catalog items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, record: &ItemRecord) -> Result<CatalogItemRow, sqlx::Error> {
        let p = &record.payload;
        let query = format!(
            "INSERT INTO catalog_items
                (name, price, original_price, category, stock, description,
                 in_stock, is_new_item, is_sale, asset_ref)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CatalogItemRow>(&query)
            .bind(&p.name)
            .bind(p.price)
            .bind(p.original_price)
            .bind(&p.category)
            .bind(p.stock)
            .bind(&p.description)
            .bind(p.in_stock)
            .bind(p.is_new_item)
            .bind(p.is_sale)
            .bind(record.asset_ref.as_ref().map(AssetRef::as_str))
            .fetch_one(pool)
            .await
    }

    /// Find an item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CatalogItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_items WHERE id = $1");
        sqlx::query_as::<_, CatalogItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all items, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<CatalogItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_items ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, CatalogItemRow>(&query).fetch_all(pool).await
    }

    /// Overwrite every column of an item whose version is still `expected_version`.
    ///
    /// Returns `None` if the row is missing or its version moved on.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        expected_version: i64,
        record: &ItemRecord,
    ) -> Result<Option<CatalogItemRow>, sqlx::Error> {
        let p = &record.payload;
        let query = format!(
            "UPDATE catalog_items SET
                name = $3,
                price = $4,
                original_price = $5,
                category = $6,
                stock = $7,
                description = $8,
                in_stock = $9,
                is_new_item = $10,
                is_sale = $11,
                asset_ref = $12,
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CatalogItemRow>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(&p.name)
            .bind(p.price)
            .bind(p.original_price)
            .bind(&p.category)
            .bind(p.stock)
            .bind(&p.description)
            .bind(p.in_stock)
            .bind(p.is_new_item)
            .bind(p.is_sale)
            .bind(record.asset_ref.as_ref().map(AssetRef::as_str))
            .fetch_optional(pool)
            .await
    }

    /// Whether a row with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM catalog_items WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete an item by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every non-null `asset_ref`.
    pub async fn list_asset_refs(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT asset_ref FROM catalog_items WHERE asset_ref IS NOT NULL")
            .fetch_all(pool)
            .await
    }

    /// Whether any row references `asset_ref`.
    pub async fn asset_ref_exists(pool: &PgPool, asset_ref: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM catalog_items WHERE asset_ref = $1)")
            .bind(asset_ref)
            .fetch_one(pool)
            .await
    }
}

/// Translate a sqlx error into the domain taxonomy.
///
/// Unique violations on `uq_` constraints are conflicts; everything else is
/// an unavailable or misbehaving store.
fn storage_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Catalog database error");
    CoreError::StorageFailure(format!("record store: {err}"))
}

/// [`CatalogRepository`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn create(&self, record: &ItemRecord) -> Result<CatalogItem, CoreError> {
        ItemRepo::create(&self.pool, record)
            .await
            .map(CatalogItem::from)
            .map_err(storage_error)
    }

    async fn get(&self, id: DbId) -> Result<Option<CatalogItem>, CoreError> {
        ItemRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(CatalogItem::from))
            .map_err(storage_error)
    }

    async fn list(&self) -> Result<Vec<CatalogItem>, CoreError> {
        ItemRepo::list(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(CatalogItem::from).collect())
            .map_err(storage_error)
    }

    async fn replace(
        &self,
        id: DbId,
        expected_version: i64,
        record: &ItemRecord,
    ) -> Result<ReplaceOutcome, CoreError> {
        let replaced = ItemRepo::replace(&self.pool, id, expected_version, record)
            .await
            .map_err(storage_error)?;
        if let Some(row) = replaced {
            return Ok(ReplaceOutcome::Replaced(row.into()));
        }
        let exists = ItemRepo::exists(&self.pool, id).await.map_err(storage_error)?;
        Ok(if exists {
            ReplaceOutcome::VersionMismatch
        } else {
            ReplaceOutcome::NotFound
        })
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        ItemRepo::delete(&self.pool, id).await.map_err(storage_error)
    }

    async fn referenced_assets(&self) -> Result<HashSet<AssetRef>, CoreError> {
        ItemRepo::list_asset_refs(&self.pool)
            .await
            .map(|refs| refs.into_iter().map(AssetRef::from).collect())
            .map_err(storage_error)
    }

    async fn is_asset_referenced(&self, asset_ref: &AssetRef) -> Result<bool, CoreError> {
        ItemRepo::asset_ref_exists(&self.pool, asset_ref.as_str())
            .await
            .map_err(storage_error)
    }
}
