//! Handlers for the `/items` resource.
//!
//! Create and update take `multipart/form-data`: item fields arrive as text
//! parts and the optional asset as an `image` file part. All consistency
//! work is delegated to [`CatalogService`](storefront_core::catalog::CatalogService).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use storefront_core::assets::AssetUpload;
use storefront_core::catalog::{CatalogItem, RawItemInput};
use storefront_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart part carrying the item's asset.
const ASSET_FIELD: &str = "image";

/// Content type assumed for a file part that declares none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// GET /api/v1/items
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<CatalogItem>>>> {
    let items = state.catalog.list().await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CatalogItem>>> {
    let item = state.catalog.get(id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/items
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CatalogItem>>)> {
    let (raw, asset) = read_item_form(multipart).await?;
    let item = state.catalog.create(raw, asset).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/items/{id}
///
/// Replaces every field. The current asset is kept unless a new `image` is sent.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<CatalogItem>>> {
    let (raw, asset) = read_item_form(multipart).await?;
    let item = state.catalog.update(id, raw, asset).await?;

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/items/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.catalog.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Split a multipart item form into raw fields and an optional asset.
///
/// An `image` part with no bytes (a form submitted without choosing a file)
/// counts as no asset. Unknown text parts are ignored.
async fn read_item_form(mut multipart: Multipart) -> AppResult<(RawItemInput, Option<AssetUpload>)> {
    let mut raw = RawItemInput::default();
    let mut asset = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == ASSET_FIELD {
            let content_type = field
                .content_type()
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_string();
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;

            if bytes.is_empty() {
                continue;
            }
            asset = Some(AssetUpload {
                bytes: bytes.to_vec(),
                content_type,
                file_name,
            });
        } else {
            let text = field.text().await?;
            if !raw.set(&name, Value::String(text)) {
                tracing::debug!(field = %name, "Ignoring unknown item form field");
            }
        }
    }

    Ok((raw, asset))
}
