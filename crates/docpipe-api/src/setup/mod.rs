//! Application wiring: router construction and server startup.

pub mod routes;
pub mod server;

pub use routes::create_router;
pub use server::start_server;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;

use docpipe_core::Config;
use docpipe_db::{DocumentRepository, WorkQueueRepository};
use docpipe_storage::LocalBlobStore;

use crate::state::AppState;

/// Build the production router: Postgres-backed repositories, local blob
/// store, migrations applied.
pub async fn initialize_app(config: &Config) -> Result<Router> {
    let pool = docpipe_db::connect_and_migrate(config).await?;

    let state = AppState {
        documents: Arc::new(DocumentRepository::new(pool.clone())),
        storage: Arc::new(LocalBlobStore::new(config.storage_path()).await?),
        queue: Arc::new(WorkQueueRepository::new(pool)),
    };

    Ok(create_router(state, config.max_upload_size_bytes()))
}
