//! CreateDocumentHandler - Register a document with its first version.

use std::sync::Arc;

use crate::domain::document::Document;
use crate::domain::foundation::{
    Bucket, Capability, CommandMetadata, EventId, MarcheId, SerializableDomainEvent, Timestamp,
};
use crate::domain::version::{Version, VersionLabel};
use crate::domain::workflow::{
    DocumentCreated, VersionCreated, VersionFileAttached, VersionOrigin, WorkflowError,
};
use crate::ports::{BlobStorage, DocumentRepository, EventPublisher, RoleDirectory, VersionRepository};

use super::super::access::authorize;
use super::super::rollback::Rollback;
use super::super::upload::{store, version_key, FileUpload};

/// Command to create a document on a marché.
#[derive(Debug, Clone)]
pub struct CreateDocumentCommand {
    pub marche_id: MarcheId,
    pub name: String,
    pub doc_type: String,
    /// Optional file for version "A".
    pub file: Option<FileUpload>,
}

/// Result of successful document creation.
#[derive(Debug, Clone)]
pub struct CreateDocumentResult {
    pub document: Document,
    pub version: Version,
}

/// Handler for creating documents. Mandataire only.
pub struct CreateDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
    versions: Arc<dyn VersionRepository>,
    storage: Arc<dyn BlobStorage>,
    roles: Arc<dyn RoleDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateDocumentHandler {
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
        cmd: CreateDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateDocumentResult, WorkflowError> {
        let user_id = metadata.user_id.clone();

        // 1. Authorize
        authorize(self.roles.as_ref(), &user_id, &cmd.marche_id, Capability::Submit).await?;

        // 2. Build aggregates
        let document = Document::new(cmd.marche_id, cmd.name, cmd.doc_type, user_id.clone())?;
        let mut version = Version::new(*document.id(), VersionLabel::first(), user_id.clone());

        // 3. Upload the initial file, if any
        let mut rollback = Rollback::new(self.documents.as_ref(), self.versions.as_ref())
            .with_storage(self.storage.as_ref());
        if let Some(upload) = &cmd.file {
            let key = version_key(document.id(), version.label(), upload);
            let stored = store(self.storage.as_ref(), Bucket::Documents, &key, upload).await?;
            rollback.file_stored(stored.clone());
            rollback.check(version.attach_file(stored)).await?;
        }

        // 4. Persist; a document never exists without its version A
        rollback.check(self.documents.save(&document).await).await?;
        rollback.document_saved(*document.id());
        rollback.check(self.versions.save(&version).await).await?;

        tracing::info!(
            document_id = %document.id(),
            marche_id = %document.marche_id(),
            user = %user_id,
            "document created"
        );

        // 5. Publish events
        let now = Timestamp::now();
        let mut envelopes = vec![
            DocumentCreated {
                event_id: EventId::new(),
                document_id: *document.id(),
                marche_id: *document.marche_id(),
                name: document.name().to_string(),
                doc_type: document.doc_type().to_string(),
                created_by: user_id.clone(),
                created_at: *document.created_at(),
            }
            .to_envelope()?,
            VersionCreated {
                event_id: EventId::new(),
                version_id: *version.id(),
                document_id: *document.id(),
                label: version.label(),
                origin: VersionOrigin::Initial,
                created_by: user_id,
                created_at: *version.created_at(),
            }
            .to_envelope()?,
        ];
        if let Some(file) = version.file() {
            envelopes.push(
                VersionFileAttached {
                    event_id: EventId::new(),
                    version_id: *version.id(),
                    document_id: *document.id(),
                    label: version.label(),
                    location: file.location(),
                    checksum: file.checksum.clone(),
                    size_bytes: file.size_bytes,
                    replaced_previous: false,
                    attached_at: now,
                }
                .to_envelope()?,
            );
        }
        let envelopes = envelopes.into_iter().map(|e| metadata.stamp(e)).collect();
        self.event_publisher.publish_all(envelopes).await?;

        Ok(CreateDocumentResult { document, version })
    }
}
