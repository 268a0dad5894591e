use std::sync::Arc;
use tokio::sync::mpsc;

use docpipe_core::{Config, Extractor, StubExtractor};
use docpipe_db::traits::{DocumentStore, WorkQueue};
use docpipe_db::{DocumentRepository, WorkQueueRepository};
use docpipe_storage::{BlobStore, LocalBlobStore};
use docpipe_worker::{ProcessingWorker, WorkerConfig};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;
    config.validate()?;

    docpipe_infra::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let pool = docpipe_db::connect_and_migrate(&config).await?;

    let documents: Arc<dyn DocumentStore> = Arc::new(DocumentRepository::new(pool.clone()));
    let queue: Arc<dyn WorkQueue> = Arc::new(WorkQueueRepository::new(pool));
    let storage: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(config.storage_path()).await?);
    let extractor: Arc<dyn Extractor> = Arc::new(StubExtractor);

    let worker = ProcessingWorker::new(
        documents,
        storage,
        queue,
        extractor,
        WorkerConfig::from(&config),
    );

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        docpipe_infra::shutdown_signal().await;
        let _ = shutdown_tx.send(()).await;
    });

    worker.run(shutdown_rx).await;

    Ok(())
}
