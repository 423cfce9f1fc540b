//! Blob storage port - object storage for uploaded files.
//!
//! Version files and visa attachments are kept outside the database. The
//! workflow only stores the returned `StoredFile` reference.
//!
//! # Object Layout
//!
//! ```text
//! {bucket}/{key}
//! documents/{document_id}/{label}/{file_name}
//! visas/{visa_id}/{file_name}
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{Bucket, DomainError, ErrorCode, StoredFile};

/// Port for storing and retrieving uploaded files.
///
/// # Contract
///
/// Implementations must:
/// - Write atomically (no partial object visible on failure)
/// - Compute the hex SHA-256 of the content
/// - Reject keys that escape the bucket (`..`, absolute paths)
/// - Overwrite an existing object with the same key
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `content` under `bucket/key`.
    ///
    /// # Errors
    ///
    /// - `StorageError::InvalidKey` if the key is empty or escapes the bucket
    /// - `StorageError::FileTooLarge` if the content exceeds the configured limit
    async fn put(
        &self,
        bucket: Bucket,
        key: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<StoredFile, StorageError>;

    /// Read the object at `bucket/key`.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotFound` if the object doesn't exist
    async fn get(&self, bucket: Bucket, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove the object at `bucket/key`.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotFound` if the object doesn't exist
    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, bucket: Bucket, key: &str) -> Result<bool, StorageError>;
}

/// Errors that can occur during blob storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Object was not found.
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Permission denied accessing the object.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// Key is empty or points outside its bucket.
    #[error("Invalid object key: {key}")]
    InvalidKey { key: String },

    /// IO error during file operation.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Content is too large.
    #[error("File too large: {size_bytes} bytes (max: {max_bytes})")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
}

impl StorageError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn file_too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::FileTooLarge {
            size_bytes,
            max_bytes,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                StorageError::permission_denied(err.to_string())
            }
            _ => StorageError::io(err.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        let code = match err {
            StorageError::InvalidKey { .. } | StorageError::FileTooLarge { .. } => {
                ErrorCode::ValidationFailed
            }
            _ => ErrorCode::StorageError,
        };
        let domain = DomainError::new(code, err.to_string());
        match err {
            StorageError::FileTooLarge { .. } => domain.with_detail("field", "file"),
            _ => domain,
        }
    }
}
