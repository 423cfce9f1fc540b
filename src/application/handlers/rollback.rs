//! Undo log for handlers that write to several repositories.
//!
//! Each successful write is recorded; when a later write fails the recorded
//! writes are reverted newest first. Reverting is best effort: a failed undo
//! is logged and the original error is still returned to the caller.

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, StoredFile, VersionId};
use crate::domain::version::{Version, VersionStatus};
use crate::domain::workflow::WorkflowError;
use crate::ports::{BlobStorage, DocumentRepository, VersionRepository};

use super::upload::discard;

enum Undo {
    RemoveFile(StoredFile),
    RemoveDocument(DocumentId),
    RestoreDocument(Document),
    RemoveVersion(VersionId),
    /// Put `original` back, guarded on the status that was written over it.
    RestoreStatus {
        original: Version,
        written: VersionStatus,
    },
}

pub(crate) struct Rollback<'a> {
    documents: &'a dyn DocumentRepository,
    versions: &'a dyn VersionRepository,
    storage: Option<&'a dyn BlobStorage>,
    steps: Vec<Undo>,
}

impl<'a> Rollback<'a> {
    pub fn new(documents: &'a dyn DocumentRepository, versions: &'a dyn VersionRepository) -> Self {
        Self {
            documents,
            versions,
            storage: None,
            steps: Vec::new(),
        }
    }

    pub fn with_storage(mut self, storage: &'a dyn BlobStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn file_stored(&mut self, file: StoredFile) {
        self.steps.push(Undo::RemoveFile(file));
    }

    pub fn document_saved(&mut self, id: DocumentId) {
        self.steps.push(Undo::RemoveDocument(id));
    }

    /// `original` is the document as it was read, before the update.
    pub fn document_updated(&mut self, original: Document) {
        self.steps.push(Undo::RestoreDocument(original));
    }

    pub fn version_saved(&mut self, id: VersionId) {
        self.steps.push(Undo::RemoveVersion(id));
    }

    /// `original` is the version as it was read; `written` the status stored since.
    pub fn status_written(&mut self, original: Version, written: VersionStatus) {
        self.steps.push(Undo::RestoreStatus { original, written });
    }

    /// Pass a successful write through; on failure revert everything recorded so far.
    pub async fn check<T, E>(&mut self, result: Result<T, E>) -> Result<T, WorkflowError>
    where
        E: Into<WorkflowError>,
    {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = e.into();
                self.revert(&err).await;
                Err(err)
            }
        }
    }

    async fn revert(&mut self, cause: &WorkflowError) {
        if !self.steps.is_empty() {
            tracing::warn!(error = %cause, steps = self.steps.len(), "write failed, reverting");
        }
        while let Some(step) = self.steps.pop() {
            if let Err(e) = self.undo(&step).await {
                tracing::error!(step = step.describe(), error = %e, "revert failed");
            }
        }
    }

    async fn undo(&self, step: &Undo) -> Result<(), DomainError> {
        match step {
            Undo::RemoveFile(file) => {
                if let Some(storage) = self.storage {
                    discard(storage, file).await;
                }
                Ok(())
            }
            Undo::RemoveDocument(id) => self.documents.delete(id).await,
            Undo::RestoreDocument(original) => self.documents.update(original).await,
            Undo::RemoveVersion(id) => self.versions.delete(id).await,
            Undo::RestoreStatus { original, written } => {
                self.versions.update_status(original, *written).await
            }
        }
    }
}

impl Undo {
    fn describe(&self) -> &'static str {
        match self {
            Undo::RemoveFile(_) => "remove_file",
            Undo::RemoveDocument(_) => "remove_document",
            Undo::RestoreDocument(_) => "restore_document",
            Undo::RemoveVersion(_) => "remove_version",
            Undo::RestoreStatus { .. } => "restore_status",
        }
    }
}
