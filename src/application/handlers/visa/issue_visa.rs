//! IssueVisaHandler - Record the MOE's verdict on the current version.
//!
//! # Flow
//!
//! 1. Authorize (MOE) and validate the comment before touching storage
//! 2. Apply the verdict to the document and version in memory
//! 3. Upload the optional attachment
//! 4. Write the version status conditionally on "En attente de visa"
//! 5. Persist the spawned version, the document and the visa
//! 6. Publish `VisaIssued` (and `VersionCreated` after a VAO)
//!
//! Step 4 fails with `ConcurrentModification` when another verdict landed first.
//! A failure in steps 3 to 5 reverts the writes already made, attachment included.

use std::sync::Arc;

use crate::domain::document::Document;
use crate::domain::foundation::{
    Bucket, Capability, CommandMetadata, DocumentId, EventId, SerializableDomainEvent, Timestamp,
};
use crate::domain::version::{Version, VersionStatus};
use crate::domain::visa::{Visa, VisaKind};
use crate::domain::workflow::{
    apply_visa, VersionCreated, VersionOrigin, VisaIssued, VisaOutcome, VisaPolicy, WorkflowError,
};
use crate::ports::{
    BlobStorage, DocumentRepository, EventPublisher, RoleDirectory, VersionRepository,
    VisaRepository,
};

use super::super::access::authorize;
use super::super::rollback::Rollback;
use super::super::upload::{store, visa_key, FileUpload};

/// Command to issue a visa.
#[derive(Debug, Clone)]
pub struct IssueVisaCommand {
    pub document_id: DocumentId,
    pub kind: VisaKind,
    /// Free text without the kind prefix. Required for VAO and Refusé.
    pub comment: String,
    /// Annotated plan or observation sheet.
    pub attachment: Option<FileUpload>,
}

/// Result of a recorded verdict.
#[derive(Debug, Clone)]
pub struct IssueVisaResult {
    pub document: Document,
    /// The reviewed version in its final status.
    pub version: Version,
    pub visa: Visa,
    pub outcome: VisaOutcome,
}

/// Handler for visa verdicts. MOE only.
pub struct IssueVisaHandler {
    documents: Arc<dyn DocumentRepository>,
    versions: Arc<dyn VersionRepository>,
    visas: Arc<dyn VisaRepository>,
    storage: Arc<dyn BlobStorage>,
    roles: Arc<dyn RoleDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
    policy: VisaPolicy,
}

impl IssueVisaHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        versions: Arc<dyn VersionRepository>,
        visas: Arc<dyn VisaRepository>,
        storage: Arc<dyn BlobStorage>,
        roles: Arc<dyn RoleDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
        policy: VisaPolicy,
    ) -> Self {
        Self {
            documents,
            versions,
            visas,
            storage,
            roles,
            event_publisher,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: IssueVisaCommand,
        metadata: CommandMetadata,
    ) -> Result<IssueVisaResult, WorkflowError> {
        let user_id = metadata.user_id.clone();

        // 1. Load, authorize, validate
        let mut document = self
            .documents
            .find_by_id(&cmd.document_id)
            .await?
            .ok_or(WorkflowError::DocumentNotFound(cmd.document_id))?;
        authorize(self.roles.as_ref(), &user_id, document.marche_id(), Capability::IssueVisa)
            .await?;
        let comment = self.policy.comment(cmd.kind, &cmd.comment)?;

        let label = document.current_version();
        let mut version = self
            .versions
            .find_by_label(document.id(), label)
            .await?
            .ok_or(WorkflowError::VersionNotFound {
                document_id: *document.id(),
                label,
            })?;

        // 2. Transition in memory
        let read_document = document.clone();
        let read_version = version.clone();
        let outcome = apply_visa(&mut document, &mut version, &comment, &user_id)?;

        // 3. Resolve the pending request, or record a visa nobody requested
        let (mut visa, is_new_visa) = match self.visas.find_pending(document.id(), label).await? {
            Some(pending) => (pending, false),
            None => {
                tracing::debug!(document_id = %document.id(), label = %label, "no pending visa request");
                let request =
                    Visa::request(*document.id(), label, document.created_by().clone(), None);
                (request, true)
            }
        };

        let mut rollback = Rollback::new(self.documents.as_ref(), self.versions.as_ref())
            .with_storage(self.storage.as_ref());
        let attachment = match &cmd.attachment {
            Some(upload) => {
                let key = visa_key(visa.id(), upload);
                let file = store(self.storage.as_ref(), Bucket::Visas, &key, upload).await?;
                rollback.file_stored(file.clone());
                Some(file)
            }
            None => None,
        };
        rollback
            .check(visa.issue(comment.clone(), user_id.clone(), attachment))
            .await?;

        // 4. Guarded version write
        let guarded = self
            .versions
            .update_status(&version, VersionStatus::EnAttenteVisa)
            .await;
        if let Err(e) = &guarded {
            tracing::warn!(
                document_id = %document.id(),
                label = %label,
                error = %e,
                "visa rejected, version changed concurrently"
            );
        }
        rollback.check(guarded).await?;
        rollback.status_written(read_version, version.status());

        // 5. Persist the rest: the spawned version exists before the document points at it
        if let Some(spawned) = &outcome.spawned {
            rollback.check(self.versions.save(spawned).await).await?;
            rollback.version_saved(*spawned.id());
        }
        rollback.check(self.documents.update(&document).await).await?;
        rollback.document_updated(read_document);
        let recorded = if is_new_visa {
            self.visas.save(&visa).await
        } else {
            self.visas.update(&visa).await
        };
        rollback.check(recorded).await?;

        tracing::info!(
            document_id = %document.id(),
            label = %label,
            kind = %outcome.kind,
            document_status = %outcome.document_status,
            spawned = ?outcome.spawned.as_ref().map(|v| v.label().to_string()),
            "visa issued"
        );

        // 6. Publish events
        let issued_at = visa.issued_at().copied().unwrap_or_else(Timestamp::now);
        let mut envelopes = vec![VisaIssued {
            event_id: EventId::new(),
            visa_id: *visa.id(),
            document_id: *document.id(),
            marche_id: *document.marche_id(),
            label,
            kind: outcome.kind,
            decision: visa.decision(),
            comment: comment.encode(),
            version_status: outcome.version_status,
            document_status: outcome.document_status,
            spawned_label: outcome.spawned.as_ref().map(Version::label),
            issued_by: user_id.clone(),
            issued_at,
        }
        .to_envelope()?];
        if let Some(spawned) = &outcome.spawned {
            envelopes.push(
                VersionCreated {
                    event_id: EventId::new(),
                    version_id: *spawned.id(),
                    document_id: *document.id(),
                    label: spawned.label(),
                    origin: VersionOrigin::Observations,
                    created_by: user_id,
                    created_at: *spawned.created_at(),
                }
                .to_envelope()?,
            );
        }
        let envelopes = envelopes.into_iter().map(|e| metadata.stamp(e)).collect();
        self.event_publisher.publish_all(envelopes).await?;

        Ok(IssueVisaResult {
            document,
            version,
            visa,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        as_user, consultant, mandataire, moe, FaultyDocuments, FaultyVersions, FaultyVisas, Fixture,
    };
    use crate::domain::document::DocumentStatus;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::version::VersionLabel;
    use crate::domain::visa::VisaDecision;

    fn handler(f: &Fixture) -> IssueVisaHandler {
        IssueVisaHandler::new(
            f.documents.clone(),
            f.versions.clone(),
            f.visas.clone(),
            f.storage.clone(),
            f.roles.clone(),
            f.events.clone(),
            f.policy,
        )
    }

    fn command(document: &Document, kind: VisaKind, comment: &str) -> IssueVisaCommand {
        IssueVisaCommand {
            document_id: *document.id(),
            kind,
            comment: comment.to_string(),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn vso_validates_document() {
        let f = Fixture::new();
        let document = f.diffused().await;

        let result = handler(&f)
            .handle(command(&document, VisaKind::Vso, ""), as_user(moe()))
            .await
            .unwrap();

        assert_eq!(result.version.status(), VersionStatus::Bpe);
        assert_eq!(result.document.status(), DocumentStatus::Valide);
        assert_eq!(result.visa.decision(), VisaDecision::Approved);
        assert!(result.outcome.spawned.is_none());

        let stored = f.documents.find_by_id(document.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::Valide);
        assert_eq!(f.versions.list_by_document(document.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn vao_spawns_version_b() {
        let f = Fixture::new();
        let document = f.diffused().await;

        let result = handler(&f)
            .handle(
                command(&document, VisaKind::Vao, "Compléter les cotes du R+1"),
                as_user(moe()),
            )
            .await
            .unwrap();

        assert_eq!(result.version.status(), VersionStatus::ARemettreAJour);
        assert_eq!(result.document.status(), DocumentStatus::EnAttenteDiffusion);
        assert_eq!(result.document.current_version().to_string(), "B");

        let versions = f.versions.list_by_document(document.id()).await.unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[1].label().to_string(), "B");
        assert_eq!(versions[1].status(), VersionStatus::EnAttenteDiffusion);
        assert_eq!(versions[1].created_by(), &moe());

        let created = f.events.events_of_type("version.created.v1");
        assert_eq!(created.last().unwrap().payload["origin"], "observations");
    }

    #[tokio::test]
    async fn refusal_sends_document_back() {
        let f = Fixture::new();
        let document = f.diffused().await;

        let result = handler(&f)
            .handle(command(&document, VisaKind::Refuse, "Hors programme"), as_user(moe()))
            .await
            .unwrap();

        assert_eq!(result.version.status(), VersionStatus::Refuse);
        assert_eq!(result.document.status(), DocumentStatus::EnAttenteDiffusion);
        assert_eq!(result.visa.decision(), VisaDecision::Rejected);
        assert_eq!(
            result.visa.comment().map(|c| c.encode()),
            Some("Refusé: Hors programme".to_string())
        );
        assert_eq!(f.versions.list_by_document(document.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resolves_the_pending_request() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let pending = f
            .visas
            .find_pending(document.id(), VersionLabel::first())
            .await
            .unwrap()
            .unwrap();

        let result = handler(&f)
            .handle(command(&document, VisaKind::Vso, ""), as_user(moe()))
            .await
            .unwrap();

        assert_eq!(result.visa.id(), pending.id());
        let visas = f.visas.list_by_document(document.id()).await.unwrap();
        assert_eq!(visas.len(), 1);
        assert_eq!(visas[0].issued_by(), Some(&moe()));
        assert_eq!(visas[0].requested_by(), &mandataire());
    }

    #[tokio::test]
    async fn vao_without_comment_is_rejected() {
        let f = Fixture::new();
        let document = f.diffused().await;

        let result = handler(&f)
            .handle(command(&document, VisaKind::Vao, "   "), as_user(moe()))
            .await;

        assert!(matches!(result, Err(WorkflowError::InvalidComment(_))));
        let stored = f.documents.find_by_id(document.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::EnAttenteVisa);
    }

    #[tokio::test]
    async fn refusal_with_short_comment_is_rejected() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let result = handler(&f)
            .handle(command(&document, VisaKind::Refuse, "no"), as_user(moe()))
            .await;
        assert!(matches!(result, Err(WorkflowError::InvalidComment(_))));
    }

    #[tokio::test]
    async fn visa_before_diffusion_is_rejected() {
        let f = Fixture::new();
        let document = f.created().await;
        let result = handler(&f)
            .handle(command(&document, VisaKind::Vso, ""), as_user(moe()))
            .await;
        assert!(matches!(result, Err(WorkflowError::VersionNotAwaitingVisa { .. })));
        assert!(!f.events.has_event("visa.issued.v1"));
    }

    #[tokio::test]
    async fn mandataire_cannot_issue_visa() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let result = handler(&f)
            .handle(command(&document, VisaKind::Vso, ""), as_user(mandataire()))
            .await;
        assert!(matches!(
            result,
            Err(WorkflowError::Forbidden {
                capability: Capability::IssueVisa
            })
        ));
    }

    #[tokio::test]
    async fn consultant_cannot_issue_visa() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let result = handler(&f)
            .handle(command(&document, VisaKind::Vso, ""), as_user(consultant()))
            .await;
        assert!(matches!(result, Err(WorkflowError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn attachment_goes_to_visas_bucket() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let mut cmd = command(&document, VisaKind::Vao, "Voir plan annoté");
        cmd.attachment = Some(FileUpload::new("annotations.pdf", b"%PDF-obs".to_vec()));

        let result = handler(&f).handle(cmd, as_user(moe())).await.unwrap();

        let attachment = result.visa.attachment().unwrap();
        assert_eq!(attachment.bucket, Bucket::Visas);
        assert!(attachment.key.starts_with(&result.visa.id().to_string()));
        assert!(f.storage.exists(Bucket::Visas, &attachment.key).await.unwrap());
    }

    fn handler_with(
        f: &Fixture,
        documents: Arc<dyn DocumentRepository>,
        versions: Arc<dyn VersionRepository>,
        visas: Arc<dyn VisaRepository>,
    ) -> IssueVisaHandler {
        IssueVisaHandler::new(
            documents,
            versions,
            visas,
            f.storage.clone(),
            f.roles.clone(),
            f.events.clone(),
            f.policy,
        )
    }

    /// Document still awaits a verdict on A, with its request pending and no file left over.
    async fn assert_untouched(f: &Fixture, document: &Document) {
        let stored = f.documents.find_by_id(document.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DocumentStatus::EnAttenteVisa);
        assert_eq!(stored.current_version(), VersionLabel::first());
        let versions = f.versions.list_by_document(document.id()).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].status(), VersionStatus::EnAttenteVisa);
        assert!(f
            .visas
            .find_pending(document.id(), VersionLabel::first())
            .await
            .unwrap()
            .is_some());
        assert_eq!(f.storage.object_count(), 0);
        assert!(!f.events.has_event("visa.issued.v1"));
    }

    fn with_attachment(mut cmd: IssueVisaCommand) -> IssueVisaCommand {
        cmd.attachment = Some(FileUpload::new("obs.pdf", b"obs".to_vec()));
        cmd
    }

    #[tokio::test]
    async fn concurrent_verdict_leaves_no_trace() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let racing = FaultyVersions::over(f.versions.clone())
            .failing_status(ErrorCode::ConcurrentModification);
        let h = handler_with(&f, f.documents.clone(), Arc::new(racing), f.visas.clone());

        let result = h
            .handle(
                with_attachment(command(&document, VisaKind::Vao, "Reprendre la note")),
                as_user(moe()),
            )
            .await;

        assert!(matches!(result, Err(WorkflowError::ConcurrentModification(_))));
        assert_untouched(&f, &document).await;
    }

    #[tokio::test]
    async fn failed_spawn_keeps_document_on_reviewed_version() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let versions = FaultyVersions::over(f.versions.clone()).failing_save(ErrorCode::DatabaseError);
        let h = handler_with(&f, f.documents.clone(), Arc::new(versions), f.visas.clone());

        let result = h
            .handle(
                with_attachment(command(&document, VisaKind::Vao, "Compléter les cotes")),
                as_user(moe()),
            )
            .await;

        assert!(matches!(result, Err(WorkflowError::Infrastructure(_))));
        assert_untouched(&f, &document).await;

        let retried = handler(&f)
            .handle(command(&document, VisaKind::Vao, "Compléter les cotes"), as_user(moe()))
            .await
            .unwrap();
        assert_eq!(retried.document.current_version().to_string(), "B");
        assert_eq!(f.versions.list_by_document(document.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_document_write_removes_spawned_version() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let documents = FaultyDocuments::over(f.documents.clone(), ErrorCode::DatabaseError);
        let h = handler_with(&f, Arc::new(documents), f.versions.clone(), f.visas.clone());

        let result = h
            .handle(
                with_attachment(command(&document, VisaKind::Vao, "Compléter les cotes")),
                as_user(moe()),
            )
            .await;

        assert!(matches!(result, Err(WorkflowError::Infrastructure(_))));
        assert_untouched(&f, &document).await;

        let retried = handler(&f)
            .handle(command(&document, VisaKind::Vso, ""), as_user(moe()))
            .await
            .unwrap();
        assert_eq!(retried.document.status(), DocumentStatus::Valide);
    }

    #[tokio::test]
    async fn failed_visa_write_restores_document_and_discards_attachment() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let visas = FaultyVisas::over(f.visas.clone(), ErrorCode::DatabaseError);
        let h = handler_with(&f, f.documents.clone(), f.versions.clone(), Arc::new(visas));

        let result = h
            .handle(
                with_attachment(command(&document, VisaKind::Vao, "Voir plan annoté")),
                as_user(moe()),
            )
            .await;

        assert!(matches!(result, Err(WorkflowError::Infrastructure(_))));
        assert_untouched(&f, &document).await;
    }

    #[tokio::test]
    async fn second_verdict_on_same_version_fails() {
        let f = Fixture::new();
        let document = f.diffused().await;
        let h = handler(&f);
        h.handle(command(&document, VisaKind::Vso, ""), as_user(moe()))
            .await
            .unwrap();

        let result = h
            .handle(command(&document, VisaKind::Refuse, "trop tard"), as_user(moe()))
            .await;
        assert!(matches!(
            result,
            Err(WorkflowError::VersionNotAwaitingVisa { .. })
        ));
    }
}
