//! Integration tests for `/api/v1/admin/assets/sweep`.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, mug_form, post_empty, send_form, PNG_BYTES};
use storefront_core::assets::AssetStore;

#[tokio::test]
async fn sweep_removes_orphans_and_spares_referenced_assets() {
    let t = build_test_app().await;

    let form = mug_form().file("image", "mug.png", "image/png", PNG_BYTES);
    let response = send_form(t.app(), Method::POST, "/api/v1/items", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let orphan = t
        .catalog
        .assets()
        .stage(b"\x89PNG orphan", "image/png", None)
        .await
        .unwrap();
    assert_eq!(t.asset_count(), 2);

    let response = post_empty(t.app(), "/api/v1/admin/assets/sweep?graceSecs=0").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["scanned"], 2);
    assert_eq!(json["data"]["referenced"], 1);
    assert_eq!(json["data"]["orphansRemoved"], 1);
    assert!(json["data"]["errors"].as_array().unwrap().is_empty());

    assert!(!t.catalog.assets().exists(&orphan).await.unwrap());
    assert_eq!(t.asset_count(), 1);
}

#[tokio::test]
async fn sweep_spares_recent_orphans_by_default() {
    let t = build_test_app().await;

    t.catalog
        .assets()
        .stage(b"\x89PNG fresh", "image/png", None)
        .await
        .unwrap();

    let response = post_empty(t.app(), "/api/v1/admin/assets/sweep").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["orphansRemoved"], 0);
    assert_eq!(json["data"]["skippedRecent"], 1);
    assert_eq!(t.asset_count(), 1);
}
