//! Blob storage adapters.
//!
//! Implementations of the `BlobStorage` port for uploaded files.
//!
//! ## Available Adapters
//!
//! - **LocalBlobStorage** - One directory per bucket on local disk
//! - **InMemoryBlobStorage** - Objects kept in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryBlobStorage, LocalBlobStorage};
//!
//! let storage = LocalBlobStorage::new("./data/blobs", 50 * 1024 * 1024);
//! let storage = InMemoryBlobStorage::new();
//! ```

mod in_memory_blob_storage;
mod local_blob_storage;

pub use in_memory_blob_storage::InMemoryBlobStorage;
pub use local_blob_storage::LocalBlobStorage;

use sha2::{Digest, Sha256};

use crate::ports::StorageError;

/// Hex-encoded SHA-256 of `content`.
pub(crate) fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Rejects keys that are empty, absolute, or walk out of the bucket.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let escapes = key
        .split(['/', '\\'])
        .any(|segment| segment == ".." || segment == ".");
    if key.trim().is_empty() || key.starts_with('/') || key.starts_with('\\') || escapes {
        return Err(StorageError::invalid_key(key));
    }
    Ok(())
}
