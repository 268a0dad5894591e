//! Document processing worker loop.
//!
//! One document at a time: dequeue, claim (persist `Processing`), extract,
//! persist the terminal state. Failures inside a single document's
//! processing are contained to that document; only infrastructure failures
//! (queue, repository) reach the loop-level handler, which logs and backs
//! off without terminating the worker.
//!
//! Shutdown: [`ProcessingWorker::run`] checks the shutdown channel at the
//! top of every iteration and during every sleep. Updates already issued
//! before cancellation complete normally.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

use docpipe_core::models::{Document, DocumentStatus, QueuedWorkItem};
use docpipe_core::Extractor;
use docpipe_db::traits::{DocumentStore, WorkQueue};
use docpipe_storage::BlobStore;

#[derive(Clone)]
pub struct WorkerConfig {
    /// Sleep between polls when the queue is empty.
    pub poll_interval: Duration,
    /// Longer sleep after an unexpected infrastructure error.
    pub error_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            error_backoff: Duration::from_secs(5),
        }
    }
}

impl From<&docpipe_core::Config> for WorkerConfig {
    fn from(config: &docpipe_core::Config) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms()),
            error_backoff: Duration::from_secs(config.error_backoff_secs()),
        }
    }
}

/// A single logical consumer. No internal parallelism; multiple worker
/// processes may run against the same queue and rely on its single-delivery
/// guarantee.
pub struct ProcessingWorker {
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn BlobStore>,
    queue: Arc<dyn WorkQueue>,
    extractor: Arc<dyn Extractor>,
    config: WorkerConfig,
}

impl ProcessingWorker {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn BlobStore>,
        queue: Arc<dyn WorkQueue>,
        extractor: Arc<dyn Extractor>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            documents,
            storage,
            queue,
            extractor,
            config,
        }
    }

    /// Run until a shutdown message arrives (or the sender is dropped).
    pub async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        tracing::info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            error_backoff_secs = self.config.error_backoff.as_secs(),
            "Processing worker started"
        );

        loop {
            match shutdown_rx.try_recv() {
                Ok(()) | Err(mpsc::error::TryRecvError::Disconnected) => break,
                Err(mpsc::error::TryRecvError::Empty) => {}
            }

            match self.poll_once().await {
                Ok(true) => {
                    // A message was consumed; poll again immediately.
                }
                Ok(false) => {
                    tokio::select! {
                        _ = shutdown_rx.recv() => break,
                        _ = sleep(self.config.poll_interval) => {}
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Unexpected error in processing loop");
                    tokio::select! {
                        _ = shutdown_rx.recv() => break,
                        _ = sleep(self.config.error_backoff) => {}
                    }
                }
            }
        }

        tracing::info!("Processing worker stopping");
    }

    /// One loop iteration: dequeue and process a single message.
    ///
    /// Returns `Ok(true)` when a message was consumed (whatever the outcome
    /// for its document), `Ok(false)` when the queue was empty. Errors are
    /// infrastructure failures only; per-document failures end up on the
    /// document row, not here.
    pub async fn poll_once(&self) -> Result<bool> {
        let Some(item) = self.queue.dequeue().await? else {
            return Ok(false);
        };

        self.process_item(item).await?;
        Ok(true)
    }

    async fn process_item(&self, item: QueuedWorkItem) -> Result<()> {
        let document_id = item.document_id;
        tracing::info!(document_id = %document_id, "Dequeued document for processing");

        let Some(mut doc) = self.documents.get_by_id(document_id).await? else {
            // Orphaned message: nothing to do, nothing to requeue.
            tracing::warn!(document_id = %document_id, "Document not found, skipping message");
            return Ok(());
        };

        // Claim before any extraction work so status reflects in-flight state.
        doc.status = DocumentStatus::Processing;
        self.documents
            .update(&doc)
            .await
            .context("Failed to mark document as processing")?;

        if let Err(e) = self.extract_and_finalize(&mut doc).await {
            tracing::error!(
                document_id = %document_id,
                error = %e,
                "Document processing failed"
            );
            // Terminal failure: recorded on the row, never requeued. Success
            // fields may have been staged before the persist failed; a Failed
            // row must never carry them.
            doc.status = DocumentStatus::Failed;
            doc.result_path = None;
            doc.processed_at = None;
            doc.error_message = Some(e.to_string());
            self.documents
                .update(&doc)
                .await
                .context("Failed to mark document as failed")?;
            return Ok(());
        }

        tracing::info!(document_id = %document_id, "Document processed successfully");
        Ok(())
    }

    /// The contained phase: any error here marks the document `Failed`.
    async fn extract_and_finalize(&self, doc: &mut Document) -> Result<()> {
        let raw = self.storage.get_raw(doc.id).await?;
        let result = self
            .extractor
            .process(&raw, doc.form_type.as_deref())
            .await?;

        let json = result.to_json()?;
        let result_path = self.storage.put_result(doc.id, &json).await?;

        doc.status = DocumentStatus::Succeeded;
        doc.processed_at = Some(chrono::Utc::now());
        doc.result_path = Some(result_path);
        self.documents.update(doc).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docpipe_core::{ExtractionResult, StubExtractor};
    use docpipe_db::test_helpers::{MockDocumentStore, MockWorkQueue};
    use docpipe_storage::test_helpers::MockBlobStore;
    use uuid::Uuid;

    struct FailingExtractor;

    #[async_trait]
    impl Extractor for FailingExtractor {
        async fn process(
            &self,
            _raw: &[u8],
            _form_type: Option<&str>,
        ) -> Result<ExtractionResult> {
            Err(anyhow::anyhow!("boom"))
        }
    }

    struct Fixture {
        documents: MockDocumentStore,
        storage: MockBlobStore,
        queue: MockWorkQueue,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                documents: MockDocumentStore::new(),
                storage: MockBlobStore::new(),
                queue: MockWorkQueue::new(),
            }
        }

        fn worker(&self, extractor: Arc<dyn Extractor>) -> ProcessingWorker {
            ProcessingWorker::new(
                Arc::new(self.documents.clone()),
                Arc::new(self.storage.clone()),
                Arc::new(self.queue.clone()),
                extractor,
                WorkerConfig {
                    poll_interval: Duration::from_millis(10),
                    error_backoff: Duration::from_millis(10),
                },
            )
        }

        /// Upload a document the way the ingestion service does: blob first,
        /// then row, then message.
        async fn upload(&self, form_type: Option<&str>) -> Uuid {
            let id = Uuid::new_v4();
            let key = self.storage.put_raw(id, b"%PDF-1.4 fake".to_vec()).await.unwrap();
            let doc = Document::new_uploaded(
                id,
                "test.pdf".to_string(),
                "application/pdf".to_string(),
                13,
                key,
                form_type.map(String::from),
            );
            self.documents.create(&doc).await.unwrap();
            self.queue
                .enqueue(&QueuedWorkItem::new(id))
                .await
                .unwrap();
            id
        }
    }

    #[tokio::test]
    async fn successful_processing_reaches_succeeded() {
        let fx = Fixture::new();
        let id = fx.upload(Some("invoice")).await;

        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(worker.poll_once().await.unwrap());

        let doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Succeeded);
        assert!(doc.processed_at.is_some());
        assert!(doc.result_path.is_some());
        assert!(doc.error_message.is_none());

        let json = fx.storage.get_result(id).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["formType"], "invoice");
        assert!(fx.queue.is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_is_terminal_with_message() {
        let fx = Fixture::new();
        let id = fx.upload(Some("invoice")).await;

        let worker = fx.worker(Arc::new(FailingExtractor));
        assert!(worker.poll_once().await.unwrap());

        let doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Failed);
        assert_eq!(doc.error_message.as_deref(), Some("boom"));
        assert!(doc.result_path.is_none());
        assert!(doc.processed_at.is_none());

        // No automatic retry: nothing was requeued.
        assert!(fx.queue.is_empty());
        assert!(fx.storage.get_result(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_queue_returns_false() {
        let fx = Fixture::new();
        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(!worker.poll_once().await.unwrap());
    }

    #[tokio::test]
    async fn orphaned_message_is_skipped_without_error() {
        let fx = Fixture::new();
        fx.queue
            .enqueue(&QueuedWorkItem::new(Uuid::new_v4()))
            .await
            .unwrap();

        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(worker.poll_once().await.unwrap());
        assert!(fx.queue.is_empty());
    }

    #[tokio::test]
    async fn missing_raw_blob_fails_the_document_not_the_loop() {
        let fx = Fixture::new();
        let id = fx.upload(None).await;
        fx.storage.remove(&docpipe_storage::keys::raw_key(id));

        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(worker.poll_once().await.unwrap());

        let doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Failed);
        assert!(doc.error_message.is_some());
    }

    /// Store double whose updates fail only when the row being written is
    /// Succeeded, so the mark-failed fallback still goes through.
    struct SucceededWriteFailsStore {
        inner: MockDocumentStore,
    }

    #[async_trait]
    impl DocumentStore for SucceededWriteFailsStore {
        async fn create(&self, doc: &Document) -> Result<()> {
            self.inner.create(doc).await
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>> {
            self.inner.get_by_id(id).await
        }

        async fn update(&self, doc: &Document) -> Result<()> {
            if doc.status == DocumentStatus::Succeeded {
                return Err(anyhow::anyhow!("simulated write failure"));
            }
            self.inner.update(doc).await
        }
    }

    #[tokio::test]
    async fn failed_row_never_carries_success_fields() {
        // The Succeeded persist fails after result_path and processed_at were
        // staged on the row; the Failed row written by the fallback must not
        // leak them.
        let fx = Fixture::new();
        let id = fx.upload(Some("invoice")).await;

        let worker = ProcessingWorker::new(
            Arc::new(SucceededWriteFailsStore {
                inner: fx.documents.clone(),
            }),
            Arc::new(fx.storage.clone()),
            Arc::new(fx.queue.clone()),
            Arc::new(StubExtractor),
            WorkerConfig::default(),
        );
        assert!(worker.poll_once().await.unwrap());

        let doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Failed);
        assert!(doc.result_path.is_none());
        assert!(doc.processed_at.is_none());
        assert!(doc.error_message.is_some());
    }

    #[tokio::test]
    async fn storage_outage_during_read_fails_the_document() {
        let fx = Fixture::new();
        let id = fx.upload(Some("invoice")).await;
        fx.storage.set_fail_reads(true);

        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(worker.poll_once().await.unwrap());

        let doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Failed);
        assert!(doc.error_message.is_some());
        assert!(doc.result_path.is_none());
    }

    #[tokio::test]
    async fn broker_outage_propagates_to_loop_handler() {
        let fx = Fixture::new();
        fx.queue.set_fail_dequeue(true);

        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(worker.poll_once().await.is_err());
    }

    #[tokio::test]
    async fn message_is_lost_when_claim_write_fails() {
        // At-most-once delivery: the message is acked at dequeue time, so a
        // failure before terminal persistence loses it permanently and the
        // document stays where it was. Accepted design gap.
        let fx = Fixture::new();
        let id = fx.upload(None).await;
        fx.documents.set_fail_updates(true);

        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(worker.poll_once().await.is_err());

        assert!(fx.queue.is_empty());
        let doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Uploaded);

        // Recovery of the broker alone does not resurrect the message.
        fx.documents.set_fail_updates(false);
        assert!(!worker.poll_once().await.unwrap());
    }

    #[tokio::test]
    async fn consumer_death_after_dequeue_leaves_document_processing_forever() {
        // Scenario: a consumer dequeues (acking the message), persists
        // Processing, then dies before extraction completes.
        let fx = Fixture::new();
        let id = fx.upload(None).await;

        let dead_consumer_item = fx.queue.dequeue().await.unwrap().unwrap();
        assert_eq!(dead_consumer_item.document_id, id);
        let mut doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        doc.status = DocumentStatus::Processing;
        fx.documents.update(&doc).await.unwrap();

        // No other message remains; a healthy worker finds nothing to do and
        // the document is stuck in Processing with no recovery path.
        let worker = fx.worker(Arc::new(StubExtractor));
        assert!(!worker.poll_once().await.unwrap());
        let doc = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Processing);
    }

    #[tokio::test]
    async fn status_observations_never_move_backwards() {
        let fx = Fixture::new();
        let id = fx.upload(Some("w2")).await;
        let worker = fx.worker(Arc::new(StubExtractor));

        let before = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(before.status, DocumentStatus::Uploaded);
        assert!(before.result_path.is_none() && before.error_message.is_none());

        worker.poll_once().await.unwrap();

        let after = fx.documents.get_by_id(id).await.unwrap().unwrap();
        assert!(before.status.can_transition_to(DocumentStatus::Processing));
        assert!(DocumentStatus::Processing.can_transition_to(after.status));
        // resultPath non-null iff Succeeded; errorMessage non-null iff Failed.
        assert_eq!(
            after.result_path.is_some(),
            after.status == DocumentStatus::Succeeded
        );
        assert_eq!(
            after.error_message.is_some(),
            after.status == DocumentStatus::Failed
        );
    }

    #[tokio::test]
    async fn shutdown_signal_stops_the_loop() {
        let fx = Fixture::new();
        let worker = fx.worker(Arc::new(StubExtractor));

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let handle = tokio::spawn(worker.run(shutdown_rx));

        shutdown_tx.send(()).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker did not stop after shutdown signal")
            .unwrap();
    }
}
