//! AttachVersionFileHandler - Upload the file of a version awaiting diffusion.

use std::sync::Arc;

use crate::domain::foundation::{
    Bucket, Capability, CommandMetadata, DocumentId, EventId, SerializableDomainEvent, StoredFile,
    Timestamp,
};
use crate::domain::version::{Version, VersionLabel};
use crate::domain::workflow::{VersionFileAttached, WorkflowError};
use crate::ports::{BlobStorage, DocumentRepository, EventPublisher, RoleDirectory, VersionRepository};

use super::super::access::authorize;
use super::super::upload::{discard, store, version_key, FileUpload};

/// Command to attach a file to a version.
#[derive(Debug, Clone)]
pub struct AttachVersionFileCommand {
    pub document_id: DocumentId,
    /// Defaults to the document's current version.
    pub label: Option<VersionLabel>,
    pub file: FileUpload,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct AttachVersionFileResult {
    pub version: Version,
    pub file: StoredFile,
    pub replaced: Option<StoredFile>,
}

/// Handler for version uploads. Mandataire only.
pub struct AttachVersionFileHandler {
    documents: Arc<dyn DocumentRepository>,
    versions: Arc<dyn VersionRepository>,
    storage: Arc<dyn BlobStorage>,
    roles: Arc<dyn RoleDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AttachVersionFileHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        versions: Arc<dyn VersionRepository>,
        storage: Arc<dyn BlobStorage>,
        roles: Arc<dyn RoleDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            documents,
            versions,
            storage,
            roles,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: AttachVersionFileCommand,
        metadata: CommandMetadata,
    ) -> Result<AttachVersionFileResult, WorkflowError> {
        // 1. Load document and authorize
        let document = self
            .documents
            .find_by_id(&cmd.document_id)
            .await?
            .ok_or(WorkflowError::DocumentNotFound(cmd.document_id))?;
        authorize(
            self.roles.as_ref(),
            &metadata.user_id,
            document.marche_id(),
            Capability::Submit,
        )
        .await?;

        // 2. Load version and check it still accepts files
        let label = cmd.label.unwrap_or_else(|| document.current_version());
        let mut version = self
            .versions
            .find_by_label(document.id(), label)
            .await?
            .ok_or(WorkflowError::VersionNotFound {
                document_id: *document.id(),
                label,
            })?;
        if !version.status().accepts_upload() {
            return Err(WorkflowError::VersionNotAwaitingDiffusion {
                label,
                status: version.status(),
            });
        }

        // 3. Upload under a fresh key and attach; no stored object is ever overwritten
        let key = version_key(document.id(), label, &cmd.file);
        let stored = store(self.storage.as_ref(), Bucket::Documents, &key, &cmd.file).await?;
        let replaced = match version.attach_file(stored.clone()) {
            Ok(replaced) => replaced,
            Err(e) => {
                discard(self.storage.as_ref(), &stored).await;
                return Err(e.into());
            }
        };

        // 4. Persist; the write fails if the version was diffused meanwhile
        if let Err(e) = self.versions.update(&version).await {
            discard(self.storage.as_ref(), &stored).await;
            return Err(e.into());
        }
        if let Some(previous) = &replaced {
            discard(self.storage.as_ref(), previous).await;
        }

        tracing::info!(
            document_id = %document.id(),
            label = %label,
            size = stored.size_bytes,
            "version file attached"
        );

        // 5. Publish event
        let event = VersionFileAttached {
            event_id: EventId::new(),
            version_id: *version.id(),
            document_id: *document.id(),
            label,
            location: stored.location(),
            checksum: stored.checksum.clone(),
            size_bytes: stored.size_bytes,
            replaced_previous: replaced.is_some(),
            attached_at: Timestamp::now(),
        };
        self.event_publisher
            .publish(metadata.stamp(event.to_envelope()?))
            .await?;

        Ok(AttachVersionFileResult {
            version,
            file: stored,
            replaced,
        })
    }
}
