//! Blob store abstraction trait

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte-oriented storage keyed by document id.
///
/// Raw uploads and result artifacts are written to separate namespaces (see
/// the crate root documentation). Writes overwrite silently; backends create
/// any needed namespace on first use.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write the raw uploaded file. Returns the storage key.
    async fn put_raw(&self, id: Uuid, data: Vec<u8>) -> StorageResult<String>;

    /// Read the raw uploaded file. `NotFound` if absent.
    async fn get_raw(&self, id: Uuid) -> StorageResult<Vec<u8>>;

    /// Write (or overwrite) the result artifact. Returns the storage key.
    async fn put_result(&self, id: Uuid, json: &str) -> StorageResult<String>;

    /// Read the result artifact. `Ok(None)` when no result exists yet, so
    /// callers can distinguish "not yet processed" from a fault.
    async fn get_result(&self, id: Uuid) -> StorageResult<Option<String>>;
}
