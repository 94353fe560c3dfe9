//! Handlers for asset maintenance under `/admin/assets`.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use storefront_core::reclamation::SweepReport;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the sweep endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepParams {
    /// Overrides the configured grace period, in seconds.
    pub grace_secs: Option<u64>,
}

/// POST /api/v1/admin/assets/sweep
///
/// Remove assets that no item references and that are older than the grace period.
pub async fn sweep(
    State(state): State<AppState>,
    Query(params): Query<SweepParams>,
) -> AppResult<Json<DataResponse<SweepReport>>> {
    let grace = params
        .grace_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| state.config.catalog.sweep_grace());

    let report = state.catalog.reconcile(grace).await?;
    Ok(Json(DataResponse { data: report }))
}
