//! In-memory blob storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{sha256_hex, validate_key};
use crate::domain::foundation::{Bucket, StoredFile};
use crate::ports::{BlobStorage, StorageError};

/// Blob storage keeping objects in a map (testing/development).
#[derive(Debug, Default)]
pub struct InMemoryBlobStorage {
    objects: RwLock<HashMap<(Bucket, String), Vec<u8>>>,
    max_file_size_bytes: Option<u64>,
}

impl InMemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage rejecting content larger than `max_file_size_bytes`.
    pub fn with_limit(max_file_size_bytes: u64) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            max_file_size_bytes: Some(max_file_size_bytes),
        }
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    fn poisoned() -> StorageError {
        StorageError::io("blob storage lock poisoned")
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn put(
        &self,
        bucket: Bucket,
        key: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<StoredFile, StorageError> {
        validate_key(key)?;
        let size = content.len() as u64;
        if let Some(max) = self.max_file_size_bytes {
            if size > max {
                return Err(StorageError::file_too_large(size, max));
            }
        }
        self.objects
            .write()
            .map_err(|_| Self::poisoned())?
            .insert((bucket, key.to_string()), content.to_vec());

        Ok(StoredFile {
            bucket,
            key: key.to_string(),
            file_name: file_name.to_string(),
            size_bytes: size,
            checksum: sha256_hex(content),
        })
    }

    async fn get(&self, bucket: Bucket, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .map_err(|_| Self::poisoned())?
            .get(&(bucket, key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::not_found(format!("{}/{}", bucket, key)))
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError> {
        self.objects
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(&(bucket, key.to_string()))
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(format!("{}/{}", bucket, key)))
    }

    async fn exists(&self, bucket: Bucket, key: &str) -> Result<bool, StorageError> {
        Ok(self
            .objects
            .read()
            .map_err(|_| Self::poisoned())?
            .contains_key(&(bucket, key.to_string())))
    }
}
