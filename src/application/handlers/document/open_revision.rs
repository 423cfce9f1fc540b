//! OpenRevisionHandler - Start the next version after a refusal.
//!
//! A VAO opens the next version on its own. A refusal does not: the
//! mandataire decides when to start over, which is this handler.

use std::sync::Arc;

use crate::domain::document::Document;
use crate::domain::foundation::{Capability, CommandMetadata, DocumentId, EventId, SerializableDomainEvent};
use crate::domain::version::Version;
use crate::domain::workflow::{open_revision, VersionCreated, VersionOrigin, WorkflowError};
use crate::ports::{DocumentRepository, EventPublisher, RoleDirectory, VersionRepository};

use super::super::access::authorize;
use super::super::rollback::Rollback;

/// Command to open a revision of a refused document.
#[derive(Debug, Clone)]
pub struct OpenRevisionCommand {
    pub document_id: DocumentId,
}

/// Result of a successful revision.
#[derive(Debug, Clone)]
pub struct OpenRevisionResult {
    pub document: Document,
    pub version: Version,
}

/// Handler for manual revisions. Mandataire only.
pub struct OpenRevisionHandler {
    documents: Arc<dyn DocumentRepository>,
    versions: Arc<dyn VersionRepository>,
    roles: Arc<dyn RoleDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl OpenRevisionHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        versions: Arc<dyn VersionRepository>,
        roles: Arc<dyn RoleDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            documents,
            versions,
            roles,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: OpenRevisionCommand,
        metadata: CommandMetadata,
    ) -> Result<OpenRevisionResult, WorkflowError> {
        let user_id = metadata.user_id.clone();

        let mut document = self
            .documents
            .find_by_id(&cmd.document_id)
            .await?
            .ok_or(WorkflowError::DocumentNotFound(cmd.document_id))?;
        authorize(self.roles.as_ref(), &user_id, document.marche_id(), Capability::Submit).await?;

        let label = document.current_version();
        let current = self
            .versions
            .find_by_label(document.id(), label)
            .await?
            .ok_or(WorkflowError::VersionNotFound {
                document_id: *document.id(),
                label,
            })?;

        let version = open_revision(&mut document, &current, user_id.clone())?;

        // The unique (document, label) constraint rejects a concurrent revision.
        let mut rollback = Rollback::new(self.documents.as_ref(), self.versions.as_ref());
        self.versions.save(&version).await?;
        rollback.version_saved(*version.id());
        rollback.check(self.documents.update(&document).await).await?;

        tracing::info!(
            document_id = %document.id(),
            previous = %label,
            label = %version.label(),
            "revision opened"
        );

        let event = VersionCreated {
            event_id: EventId::new(),
            version_id: *version.id(),
            document_id: *document.id(),
            label: version.label(),
            origin: VersionOrigin::Revision,
            created_by: user_id,
            created_at: *version.created_at(),
        };
        self.event_publisher
            .publish(metadata.stamp(event.to_envelope()?))
            .await?;

        Ok(OpenRevisionResult { document, version })
    }
}
