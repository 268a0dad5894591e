//! Shared infrastructure for the docpipe binaries.

pub mod signal;
pub mod telemetry;

pub use signal::shutdown_signal;
pub use telemetry::init_telemetry;
