//! Local-filesystem asset store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;
use tokio::io::AsyncWriteExt;

use super::constraints::{validate_asset_size, ImageFormat, ASSET_NAME_PREFIX};
use super::{AssetError, AssetRef, AssetStore, StoredAsset};

/// How many fresh names to try before giving up on a collision streak.
const MAX_NAME_ATTEMPTS: usize = 3;

/// Stores each asset as one file in a flat uploads directory.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    max_bytes: u64,
}

impl LocalAssetStore {
    /// Open (and create if missing) the uploads directory.
    pub async fn open(root: impl Into<PathBuf>, max_bytes: u64) -> Result<Self, AssetError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root, max_bytes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, asset_ref: &AssetRef) -> Result<PathBuf, AssetError> {
        Ok(self.root.join(asset_ref.file_name()?))
    }

    /// Write `bytes` to a brand-new file. Never opens an existing one.
    async fn write_new(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        let written = async {
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await;
        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(path).await {
                tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial asset");
            }
            return Err(e);
        }
        Ok(())
    }
}

/// `image-<unix millis>-<16 hex digits>.<ext>`
fn generate_file_name(ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u64 = rand::rng().random();
    format!("{ASSET_NAME_PREFIX}-{millis}-{suffix:016x}.{ext}")
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn stage(
        &self,
        bytes: &[u8],
        content_type: &str,
        original_name: Option<&str>,
    ) -> Result<AssetRef, AssetError> {
        let format = ImageFormat::from_content_type(content_type)?;
        validate_asset_size(bytes.len() as u64, self.max_bytes)?;
        let ext = format.extension_for(original_name);

        let mut attempts = 0;
        loop {
            attempts += 1;
            let file_name = generate_file_name(&ext);
            let path = self.root.join(&file_name);
            match self.write_new(&path, bytes).await {
                Ok(()) => {
                    let asset_ref = AssetRef::from_file_name(&file_name);
                    tracing::debug!(asset_ref = %asset_ref, size = bytes.len(), "Asset staged");
                    return Ok(asset_ref);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempts < MAX_NAME_ATTEMPTS => {
                    tracing::warn!(file_name = %file_name, "Generated asset name already taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn remove(&self, asset_ref: &AssetRef) -> Result<(), AssetError> {
        let path = self.path_for(asset_ref)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(asset_ref = %asset_ref, "Asset removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, asset_ref: &AssetRef) -> Result<bool, AssetError> {
        let path = self.path_for(asset_ref)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn list(&self) -> Result<Vec<StoredAsset>, AssetError> {
        let mut assets = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                // Removed between read_dir and stat.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }
            assets.push(StoredAsset {
                asset_ref: AssetRef::from_file_name(name),
                size_bytes: metadata.len(),
                modified_at: metadata.modified()?.into(),
            });
        }
        Ok(assets)
    }
}
