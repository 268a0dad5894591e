//! Docpipe Worker Library
//!
//! The processing worker: a single sequential loop that consumes queued work
//! items, drives each document through its status state machine, invokes the
//! extraction engine, and persists the result artifact.

pub mod worker;

pub use worker::{ProcessingWorker, WorkerConfig};
