//! Docpipe DB Library
//!
//! Postgres-backed persistence: the document repository (single source of
//! truth for document status) and the durable work queue. The trait seams in
//! [`traits`] let the worker and the API be tested against in-memory doubles.

pub mod documents;
pub mod pool;
pub mod queue;
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use documents::DocumentRepository;
pub use pool::connect_and_migrate;
pub use queue::WorkQueueRepository;
pub use traits::{DocumentStore, WorkQueue};
