use crate::keys;
use crate::traits::{BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem blob store.
///
/// Lays out `raw/` and `results/` namespaces under a base directory that is
/// created eagerly at construction time.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore rooted at `base_path`, creating both
    /// namespaces if they do not exist yet.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        for ns in ["raw", "results"] {
            let dir = base_path.join(ns);
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(LocalBlobStore { base_path })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(storage_key))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put_raw(&self, id: Uuid, data: Vec<u8>) -> StorageResult<String> {
        let key = keys::raw_key(id);
        let path = self.key_to_path(&key)?;
        let size = data.len();

        self.write_file(&path, &data).await?;

        tracing::info!(
            document_id = %id,
            key = %key,
            size_bytes = size,
            "Raw blob stored"
        );

        Ok(key)
    }

    async fn get_raw(&self, id: Uuid) -> StorageResult<Vec<u8>> {
        let key = keys::raw_key(id);
        let path = self.key_to_path(&key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            document_id = %id,
            key = %key,
            size_bytes = data.len(),
            "Raw blob read"
        );

        Ok(data)
    }

    async fn put_result(&self, id: Uuid, json: &str) -> StorageResult<String> {
        let key = keys::result_key(id);
        let path = self.key_to_path(&key)?;

        self.write_file(&path, json.as_bytes()).await?;

        tracing::info!(
            document_id = %id,
            key = %key,
            size_bytes = json.len(),
            "Result artifact stored"
        );

        Ok(key)
    }

    async fn get_result(&self, id: Uuid) -> StorageResult<Option<String>> {
        let key = keys::result_key(id);
        let path = self.key_to_path(&key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Ok(Some(json))
    }
}
