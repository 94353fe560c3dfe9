pub mod health;
pub mod item;
pub mod maintenance;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                         list, create (multipart)
/// /items/{id}                    get, replace (multipart), delete
///
/// /admin/assets/sweep            reclaim orphaned assets (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", item::router())
        .nest("/admin/assets", maintenance::router())
}
