//! Asset store adapter.
//!
//! Binary assets (item images) live outside the record store. The store only
//! ever writes under freshly generated names, so staging can never clobber an
//! asset that a committed record still points at. Removal is idempotent.

pub mod constraints;
pub mod local;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

pub use constraints::{ImageFormat, ASSET_URL_PREFIX, DEFAULT_MAX_ASSET_BYTES};
pub use local::LocalAssetStore;

/// Errors raised by an [`AssetStore`].
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Unsupported asset type: {0}")]
    UnsupportedType(String),

    #[error("Asset too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Invalid asset reference: {0}")]
    InvalidRef(String),

    #[error("Asset IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AssetError> for CoreError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::UnsupportedType(t) => CoreError::UnsupportedType(t),
            AssetError::TooLarge { size, limit } => CoreError::TooLarge { size, limit },
            AssetError::InvalidRef(r) => CoreError::Internal(format!("Invalid asset reference: {r}")),
            AssetError::Io(e) => CoreError::StorageFailure(format!("asset store: {e}")),
        }
    }
}

/// Stable reference to a stored asset, e.g. `/uploads/image-1718000000000-9f2c...png`.
///
/// This string is the only link between a catalog record and its asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    /// Build the reference for a file stored under the uploads directory.
    pub fn from_file_name(file_name: &str) -> Self {
        Self(format!("{ASSET_URL_PREFIX}{file_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare file name this reference resolves to.
    ///
    /// Rejects anything that is not a single plain path component, so a
    /// tampered reference cannot escape the uploads directory.
    pub fn file_name(&self) -> Result<&str, AssetError> {
        let name = self.0.strip_prefix(ASSET_URL_PREFIX).unwrap_or(&self.0);
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if plain {
            Ok(name)
        } else {
            Err(AssetError::InvalidRef(self.0.clone()))
        }
    }
}

impl From<String> for AssetRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<AssetRef> for String {
    fn from(value: AssetRef) -> Self {
        value.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uploaded asset on its way into the store.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// Original client-side file name, used only for its extension.
    pub file_name: Option<String>,
}

/// A blob present in the store, as seen by the reconciliation sweep.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub asset_ref: AssetRef,
    pub size_bytes: u64,
    pub modified_at: Timestamp,
}

/// Port for blob storage.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Validate and write `bytes` under a freshly generated name.
    ///
    /// Fails with `UnsupportedType` or `TooLarge` before anything is written.
    async fn stage(
        &self,
        bytes: &[u8],
        content_type: &str,
        original_name: Option<&str>,
    ) -> Result<AssetRef, AssetError>;

    /// Delete the blob. Removing an absent blob succeeds.
    async fn remove(&self, asset_ref: &AssetRef) -> Result<(), AssetError>;

    /// Whether the blob is currently present.
    async fn exists(&self, asset_ref: &AssetRef) -> Result<bool, AssetError>;

    /// Every blob currently in the store.
    async fn list(&self) -> Result<Vec<StoredAsset>, AssetError>;
}
