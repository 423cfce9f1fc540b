//! Uploaded file payloads and their object keys.

use uuid::Uuid;

use crate::domain::foundation::{Bucket, DocumentId, DomainError, StoredFile, VisaId};
use crate::domain::version::VersionLabel;
use crate::domain::workflow::WorkflowError;
use crate::ports::{BlobStorage, StorageError};

/// File content received with a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// File name reduced to its last path segment with unsafe characters replaced.
    pub fn safe_file_name(&self) -> String {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let cleaned = cleaned.trim_start_matches('.');
        if cleaned.is_empty() {
            "fichier".to_string()
        } else {
            cleaned.to_string()
        }
    }
}

/// `{document_id}/{label}/{upload_id}/{file_name}` in the documents bucket.
///
/// Every upload gets its own key, so a write that loses a race never
/// overwrites the object a stored version points at.
pub(crate) fn version_key(document_id: &DocumentId, label: VersionLabel, upload: &FileUpload) -> String {
    format!(
        "{}/{}/{}/{}",
        document_id,
        label,
        Uuid::new_v4().simple(),
        upload.safe_file_name()
    )
}

/// `{visa_id}/{upload_id}/{file_name}` in the visas bucket.
pub(crate) fn visa_key(visa_id: &VisaId, upload: &FileUpload) -> String {
    format!("{}/{}/{}", visa_id, Uuid::new_v4().simple(), upload.safe_file_name())
}

/// Store an upload, mapping storage failures to workflow errors.
pub(crate) async fn store(
    storage: &dyn BlobStorage,
    bucket: Bucket,
    key: &str,
    upload: &FileUpload,
) -> Result<StoredFile, WorkflowError> {
    if upload.content.is_empty() {
        return Err(WorkflowError::validation("file", "Uploaded file is empty"));
    }
    storage
        .put(bucket, key, &upload.file_name, &upload.content)
        .await
        .map_err(|e| {
            tracing::error!(bucket = %bucket, key, error = %e, "upload failed");
            storage_error(e)
        })
}

/// Best-effort removal of an object that is no longer referenced.
pub(crate) async fn discard(storage: &dyn BlobStorage, file: &StoredFile) {
    if let Err(e) = storage.delete(file.bucket, &file.key).await {
        tracing::warn!(location = %file.location(), error = %e, "failed to remove orphaned object");
    }
}

pub(crate) fn storage_error(err: StorageError) -> WorkflowError {
    WorkflowError::from(DomainError::from(err))
}
