//! HTTP request handlers, one module per endpoint.

pub mod document_get;
pub mod document_result;
pub mod document_upload;
pub mod health;
