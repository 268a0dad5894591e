//! Docpipe Storage Library
//!
//! Blob storage for raw uploads and result artifacts, keyed by document id.
//!
//! # Key format
//!
//! Raw files and result artifacts live in separate namespaces so cleanup or
//! migration of one never disturbs the other:
//!
//! - **Raw uploads**: `raw/{id}.pdf`
//! - **Result artifacts**: `results/{id}.json`
//!
//! where `{id}` is the document id rendered as a fixed-length 32-character
//! hexadecimal token. Key generation is centralized in the `keys` module so
//! all backends stay consistent.

pub mod keys;
pub mod local;
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use local::LocalBlobStore;
pub use traits::{BlobStore, StorageError, StorageResult};
