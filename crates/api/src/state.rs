use std::sync::Arc;

use storefront_core::catalog::CatalogService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, when the catalog is backed by PostgreSQL.
    pub pool: Option<storefront_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Consistency coordinator for catalog items and their assets.
    pub catalog: CatalogService,
}
