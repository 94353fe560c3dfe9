#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use storefront_api::config::{CatalogConfig, ServerConfig};
use storefront_api::router::build_app_router;
use storefront_api::state::AppState;
use storefront_core::assets::{LocalAssetStore, DEFAULT_MAX_ASSET_BYTES};
use storefront_core::catalog::{CatalogService, InMemoryCatalogRepository};

/// Build a test `ServerConfig` with safe defaults and the given uploads directory.
pub fn test_config(uploads_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        catalog: CatalogConfig {
            uploads_dir,
            max_asset_bytes: DEFAULT_MAX_ASSET_BYTES,
            lock_timeout_ms: 1000,
            sweep_interval_secs: 0,
            sweep_grace_secs: 3600,
        },
    }
}

/// A fully wired application backed by the in-memory repository and a
/// temporary uploads directory that lives as long as this value.
pub struct TestApp {
    pub router: Router,
    pub catalog: CatalogService,
    pub uploads: TempDir,
}

impl TestApp {
    /// Number of files currently in the uploads directory.
    pub fn asset_count(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .count()
    }

    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub async fn build_test_app() -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = test_config(uploads.path().to_path_buf());

    let assets = LocalAssetStore::open(uploads.path(), config.catalog.max_asset_bytes)
        .await
        .unwrap();
    let catalog = CatalogService::new(
        Arc::new(InMemoryCatalogRepository::new()),
        Arc::new(assets),
        Duration::from_millis(config.catalog.lock_timeout_ms),
    );

    let state = AppState {
        pool: None,
        config: Arc::new(config.clone()),
        catalog: catalog.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        catalog,
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, Body::empty(), None).await
}

pub async fn send_form(app: Router, method: Method, uri: &str, form: MultipartForm) -> Response {
    let (content_type, body) = form.finish();
    send(app, method, uri, Body::from(body), Some(content_type)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<String>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart builder
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "storefront-test-boundary-7f3a9c";

/// Minimal `multipart/form-data` encoder for item forms.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

/// The form fields of a valid item, ready for an optional image part.
pub fn mug_form() -> MultipartForm {
    MultipartForm::new()
        .text("name", "Mug")
        .text("price", "9.5")
        .text("originalPrice", "")
        .text("category", "kitchen")
        .text("stock", "3")
        .text("description", "Stoneware")
        .text("inStock", "true")
        .text("isNewItem", "false")
        .text("isSale", "false")
}

/// A tiny byte string that carries the PNG signature.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n0000IHDR";
