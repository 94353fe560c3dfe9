//! Route definitions for `/admin/assets`.

use axum::routing::post;
use axum::Router;

use crate::handlers::maintenance;
use crate::state::AppState;

/// Routes mounted at `/admin/assets`.
///
/// ```text
/// POST   /sweep   -> remove orphaned assets
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/sweep", post(maintenance::sweep))
}
