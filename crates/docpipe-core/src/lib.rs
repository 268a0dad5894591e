//! Docpipe Core Library
//!
//! This crate provides the core domain models, error types, configuration,
//! and the extraction-engine contract shared by the API and the worker.

pub mod config;
pub mod error;
pub mod extraction;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::AppError;
pub use extraction::{ExtractionResult, Extractor, StubExtractor};
