use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::traits::WorkQueue;
use docpipe_core::models::QueuedWorkItem;

/// Postgres-backed durable work queue.
///
/// Messages are rows in `work_queue`; the `payload` column carries exactly
/// the QueuedWorkItem wire object. `dequeue` deletes the oldest claimable
/// row in the same statement that returns it (`FOR UPDATE SKIP LOCKED`), so
/// each message is delivered to at most one consumer and is acknowledged
/// before processing begins, so delivery is at-most-once. Rows survive
/// restarts while queued.
///
/// The pool is an explicitly initialized, owned client handle supplied by
/// the caller; this type holds no global connection state.
#[derive(Clone)]
pub struct WorkQueueRepository {
    pool: PgPool,
}

impl WorkQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkQueue for WorkQueueRepository {
    #[tracing::instrument(skip(self, item), fields(document_id = %item.document_id))]
    async fn enqueue(&self, item: &QueuedWorkItem) -> Result<()> {
        let payload = serde_json::to_value(item).context("Failed to serialize queue message")?;

        sqlx::query("INSERT INTO work_queue (payload) VALUES ($1)")
            .bind(payload)
            .execute(&self.pool)
            .await
            .context("Failed to enqueue work item")?;

        tracing::info!(
            document_id = %item.document_id,
            attempt = item.attempt,
            "Work item enqueued"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn dequeue(&self) -> Result<Option<QueuedWorkItem>> {
        // Delete-on-read: the row is gone the moment it is handed out.
        let payload: Option<(serde_json::Value,)> = sqlx::query_as(
            r#"
            DELETE FROM work_queue
            WHERE id = (
                SELECT id
                FROM work_queue
                ORDER BY id
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING payload
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to dequeue work item")?;

        let Some((payload,)) = payload else {
            return Ok(None);
        };

        let item: QueuedWorkItem = serde_json::from_value(payload)
            .context("Failed to deserialize queue message")?;

        tracing::debug!(document_id = %item.document_id, "Work item dequeued");

        Ok(Some(item))
    }
}

