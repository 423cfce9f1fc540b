//! Local filesystem blob storage.
//!
//! Stores each bucket as a directory under a base path. Writes go to a
//! temporary sibling file first and are renamed into place once synced.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{sha256_hex, validate_key};
use crate::config::StorageConfig;
use crate::domain::foundation::{Bucket, StoredFile};
use crate::ports::{BlobStorage, StorageError};

/// Local filesystem storage for uploaded files.
///
/// # Directory Structure
///
/// ```text
/// {base_path}/
/// ├── documents/
/// │   └── {document_id}/A/plan.pdf
/// └── visas/
///     └── {visa_id}/observations.pdf
/// ```
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    base_path: PathBuf,
    max_file_size_bytes: u64,
}

impl LocalBlobStorage {
    /// Creates a storage rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>, max_file_size_bytes: u64) -> Self {
        Self {
            base_path: base_path.into(),
            max_file_size_bytes,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.base_path.clone(), config.max_file_size_bytes)
    }

    fn object_path(&self, bucket: Bucket, key: &str) -> PathBuf {
        self.base_path.join(bucket.as_str()).join(key)
    }

    fn temp_path(path: &std::path::Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn put(
        &self,
        bucket: Bucket,
        key: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<StoredFile, StorageError> {
        validate_key(key)?;
        let size = content.len() as u64;
        if size > self.max_file_size_bytes {
            return Err(StorageError::file_too_large(size, self.max_file_size_bytes));
        }

        let final_path = self.object_path(bucket, key);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = Self::temp_path(&final_path);
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.write_all(content).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::io(format!(
                "Failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::debug!(bucket = %bucket, key, size, "object stored");

        Ok(StoredFile {
            bucket,
            key: key.to_string(),
            file_name: file_name.to_string(),
            size_bytes: size,
            checksum: sha256_hex(content),
        })
    }

    async fn get(&self, bucket: Bucket, key: &str) -> Result<Vec<u8>, StorageError> {
        validate_key(key)?;
        let path = self.object_path(bucket, key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(format!("{}/{}", bucket, key)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.object_path(bucket, key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(format!("{}/{}", bucket, key)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, bucket: Bucket, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        Ok(fs::try_exists(self.object_path(bucket, key)).await?)
    }
}
