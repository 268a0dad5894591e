//! Mock repository implementations for testing
//!
//! In-memory doubles for [`DocumentStore`] and [`WorkQueue`] so the worker
//! and the API can be tested without a database.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::traits::{DocumentStore, WorkQueue};
use docpipe_core::models::{Document, QueuedWorkItem};

/// Mock document store backed by a HashMap.
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    docs: Arc<Mutex<HashMap<Uuid, Document>>>,
    fail_updates: Arc<Mutex<bool>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent updates fail, simulating repository outage.
    pub fn set_fail_updates(&self, fail: bool) {
        *self.fail_updates.lock().unwrap() = fail;
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn create(&self, doc: &Document) -> Result<()> {
        self.docs.lock().unwrap().insert(doc.id, doc.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        Ok(self.docs.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, doc: &Document) -> Result<()> {
        if *self.fail_updates.lock().unwrap() {
            return Err(anyhow::anyhow!("simulated repository outage"));
        }
        let mut docs = self.docs.lock().unwrap();
        if !docs.contains_key(&doc.id) {
            return Err(anyhow::anyhow!("Document {} does not exist", doc.id));
        }
        docs.insert(doc.id, doc.clone());
        Ok(())
    }
}

/// Mock FIFO work queue backed by a VecDeque.
#[derive(Clone, Default)]
pub struct MockWorkQueue {
    items: Arc<Mutex<VecDeque<QueuedWorkItem>>>,
    fail_dequeue: Arc<Mutex<bool>>,
}

impl MockWorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    /// Make subsequent dequeues fail, simulating broker outage.
    pub fn set_fail_dequeue(&self, fail: bool) {
        *self.fail_dequeue.lock().unwrap() = fail;
    }
}

#[async_trait]
impl WorkQueue for MockWorkQueue {
    async fn enqueue(&self, item: &QueuedWorkItem) -> Result<()> {
        self.items.lock().unwrap().push_back(item.clone());
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<QueuedWorkItem>> {
        if *self.fail_dequeue.lock().unwrap() {
            return Err(anyhow::anyhow!("simulated broker outage"));
        }
        Ok(self.items.lock().unwrap().pop_front())
    }
}
