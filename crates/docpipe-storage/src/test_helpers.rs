//! Mock BlobStore implementation for testing

use crate::keys;
use crate::traits::{BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory blob store so consumers can be tested without a filesystem.
#[derive(Clone, Default)]
pub struct MockBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    /// While set, every `get_raw` fails with a read error.
    fail_reads: Arc<Mutex<bool>>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a stored blob (e.g. to simulate a lost artifact).
    pub fn remove(&self, key: &str) {
        self.blobs.lock().unwrap().remove(key);
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    /// Make subsequent raw reads fail, simulating storage outage.
    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put_raw(&self, id: Uuid, data: Vec<u8>) -> StorageResult<String> {
        let key = keys::raw_key(id);
        self.blobs.lock().unwrap().insert(key.clone(), data);
        Ok(key)
    }

    async fn get_raw(&self, id: Uuid) -> StorageResult<Vec<u8>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(StorageError::ReadFailed("simulated outage".to_string()));
        }
        let key = keys::raw_key(id);
        self.blobs
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(StorageError::NotFound(key))
    }

    async fn put_result(&self, id: Uuid, json: &str) -> StorageResult<String> {
        let key = keys::result_key(id);
        self.blobs
            .lock()
            .unwrap()
            .insert(key.clone(), json.as_bytes().to_vec());
        Ok(key)
    }

    async fn get_result(&self, id: Uuid) -> StorageResult<Option<String>> {
        let key = keys::result_key(id);
        match self.blobs.lock().unwrap().get(&key) {
            Some(bytes) => Ok(Some(String::from_utf8_lossy(bytes).into_owned())),
            None => Ok(None),
        }
    }
}
