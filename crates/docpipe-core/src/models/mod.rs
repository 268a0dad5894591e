//! Data models for the application
//!
//! One sub-module per domain entity.

mod document;
mod queue;

pub use document::*;
pub use queue::*;
