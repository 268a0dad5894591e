//! Repository trait abstractions
//!
//! Minimal interfaces the worker and the API need from persistence, so both
//! can be exercised against in-memory doubles without a database.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use docpipe_core::models::{Document, QueuedWorkItem};

/// Persisted metadata/state for documents.
///
/// No partial-field updates: callers read, modify, and write the whole
/// entity. There is no optimistic-concurrency token; after creation only the
/// worker mutates a document's terminal fields. Concurrent readers may
/// observe any state along the forward-only status chain.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, doc: &Document) -> Result<()>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>>;

    async fn update(&self, doc: &Document) -> Result<()>;
}

/// Durable channel carrying one message per document awaiting processing.
///
/// `dequeue` is a non-blocking poll primitive: one fetch attempt, returning
/// `None` immediately when the queue is empty. Delivery is **at-most-once**:
/// the message is acknowledged (removed) the moment it is handed to the
/// caller, before any processing happens. A consumer crash after dequeue
/// loses the message permanently.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn enqueue(&self, item: &QueuedWorkItem) -> Result<()>;

    async fn dequeue(&self) -> Result<Option<QueuedWorkItem>>;
}
