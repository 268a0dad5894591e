//! Docpipe HTTP API
//!
//! Thin Axum surface over the document store, blob store, and work queue.
//! Uploads are acknowledged with 202 and handed to the background worker via
//! the queue; clients poll `GET /documents/{id}` until a terminal status and
//! then fetch the artifact from `GET /documents/{id}/result`.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
