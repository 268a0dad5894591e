//! Application state shared by all handlers.

use std::sync::Arc;

use docpipe_db::{DocumentStore, WorkQueue};
use docpipe_storage::BlobStore;

/// Handler state: trait objects only, so tests can swap in in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn BlobStore>,
    pub queue: Arc<dyn WorkQueue>,
}
