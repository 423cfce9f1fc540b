//! DiffuseDocumentHandler - Send the current version out for visa.

use std::sync::Arc;

use crate::domain::document::Document;
use crate::domain::foundation::{
    Capability, CommandMetadata, DocumentId, EventId, SerializableDomainEvent, Timestamp,
};
use crate::domain::version::{Version, VersionStatus};
use crate::domain::visa::Visa;
use crate::domain::workflow::{diffuse, DocumentDiffused, VisaPolicy, WorkflowError};
use crate::ports::{
    DocumentRepository, EventPublisher, RoleDirectory, VersionRepository, VisaRepository,
};

use super::super::access::authorize;
use super::super::rollback::Rollback;

/// Command to diffuse a document's current version.
#[derive(Debug, Clone)]
pub struct DiffuseDocumentCommand {
    pub document_id: DocumentId,
}

/// Result of a successful diffusion.
#[derive(Debug, Clone)]
pub struct DiffuseDocumentResult {
    pub document: Document,
    pub version: Version,
    /// Pending visa request opened for the MOE.
    pub visa: Visa,
}

/// Handler for diffusion. Mandataire only.
pub struct DiffuseDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
    versions: Arc<dyn VersionRepository>,
    visas: Arc<dyn VisaRepository>,
    roles: Arc<dyn RoleDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
    policy: VisaPolicy,
}

impl DiffuseDocumentHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        versions: Arc<dyn VersionRepository>,
        visas: Arc<dyn VisaRepository>,
        roles: Arc<dyn RoleDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
        policy: VisaPolicy,
    ) -> Self {
        Self {
            documents,
            versions,
            visas,
            roles,
            event_publisher,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: DiffuseDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<DiffuseDocumentResult, WorkflowError> {
        let user_id = metadata.user_id.clone();

        // 1. Load document and authorize
        let mut document = self
            .documents
            .find_by_id(&cmd.document_id)
            .await?
            .ok_or(WorkflowError::DocumentNotFound(cmd.document_id))?;
        authorize(self.roles.as_ref(), &user_id, document.marche_id(), Capability::Submit).await?;

        // 2. Load current version
        let label = document.current_version();
        let mut version = self
            .versions
            .find_by_label(document.id(), label)
            .await?
            .ok_or(WorkflowError::VersionNotFound {
                document_id: *document.id(),
                label,
            })?;

        // 3. Transition
        let read_document = document.clone();
        let read_version = version.clone();
        diffuse(&mut document, &mut version)?;

        // 4. Persist; the version write is the concurrency guard and is
        //    reverted if the document or visa write fails
        let mut rollback = Rollback::new(self.documents.as_ref(), self.versions.as_ref());
        self.versions
            .update_status(&version, VersionStatus::EnAttenteDiffusion)
            .await?;
        rollback.status_written(read_version, version.status());
        rollback.check(self.documents.update(&document).await).await?;
        rollback.document_updated(read_document);

        let now = Timestamp::now();
        let visa = Visa::request(*document.id(), label, user_id.clone(), self.policy.due_date(&now));
        rollback.check(self.visas.save(&visa).await).await?;

        tracing::info!(
            document_id = %document.id(),
            label = %label,
            due_at = ?visa.due_at(),
            "document diffused"
        );

        // 5. Publish event
        let event = DocumentDiffused {
            event_id: EventId::new(),
            document_id: *document.id(),
            marche_id: *document.marche_id(),
            label,
            visa_id: *visa.id(),
            due_at: visa.due_at().copied(),
            diffused_by: user_id,
            diffused_at: now,
        };
        self.event_publisher
            .publish(metadata.stamp(event.to_envelope()?))
            .await?;

        Ok(DiffuseDocumentResult {
            document,
            version,
            visa,
        })
    }
}
