//! In-memory wiring shared by handler tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::{
    InMemoryBlobStorage, InMemoryDocumentRepository, InMemoryEventBus, InMemoryRoleDirectory,
    InMemoryVersionRepository, InMemoryVisaRepository,
};
use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::{
    CommandMetadata, DocumentId, DomainError, ErrorCode, MarcheId, Role, UserId, VersionId,
};
use crate::domain::version::{Version, VersionLabel, VersionStatus};
use crate::domain::visa::{Visa, VisaKind};
use crate::domain::workflow::VisaPolicy;
use crate::ports::{DocumentRepository, VersionRepository, VisaRepository};

use super::document::{
    CreateDocumentCommand, CreateDocumentHandler, DiffuseDocumentCommand, DiffuseDocumentHandler,
};
use super::visa::{IssueVisaCommand, IssueVisaHandler};

pub(crate) struct Fixture {
    pub marche_id: MarcheId,
    pub documents: Arc<InMemoryDocumentRepository>,
    pub versions: Arc<InMemoryVersionRepository>,
    pub visas: Arc<InMemoryVisaRepository>,
    pub roles: Arc<InMemoryRoleDirectory>,
    pub storage: Arc<InMemoryBlobStorage>,
    pub events: Arc<InMemoryEventBus>,
    pub policy: VisaPolicy,
}

impl Fixture {
    pub fn new() -> Self {
        let marche_id = MarcheId::new();
        let roles = InMemoryRoleDirectory::new()
            .with_role(mandataire(), marche_id, Role::Mandataire)
            .with_role(moe(), marche_id, Role::Moe)
            .with_role(consultant(), marche_id, Role::Consultant);
        Self {
            marche_id,
            documents: Arc::new(InMemoryDocumentRepository::new()),
            versions: Arc::new(InMemoryVersionRepository::new()),
            visas: Arc::new(InMemoryVisaRepository::new()),
            roles: Arc::new(roles),
            storage: Arc::new(InMemoryBlobStorage::new()),
            events: Arc::new(InMemoryEventBus::new()),
            policy: VisaPolicy::default(),
        }
    }

    /// A fresh document with version A and no file.
    pub async fn created(&self) -> Document {
        CreateDocumentHandler::new(
            self.documents.clone(),
            self.versions.clone(),
            self.storage.clone(),
            self.roles.clone(),
            self.events.clone(),
        )
        .handle(
            CreateDocumentCommand {
                marche_id: self.marche_id,
                name: "Note de calcul".to_string(),
                doc_type: "NDC".to_string(),
                file: None,
            },
            as_user(mandataire()),
        )
        .await
        .unwrap()
        .document
    }

    /// A document whose version A awaits the MOE.
    pub async fn diffused(&self) -> Document {
        let document = self.created().await;
        self.diffuse(*document.id()).await
    }

    /// Diffuse the current version of an existing document.
    pub async fn diffuse(&self, document_id: DocumentId) -> Document {
        DiffuseDocumentHandler::new(
            self.documents.clone(),
            self.versions.clone(),
            self.visas.clone(),
            self.roles.clone(),
            self.events.clone(),
            self.policy,
        )
        .handle(
            DiffuseDocumentCommand { document_id },
            as_user(mandataire()),
        )
        .await
        .unwrap()
        .document
    }

    /// A document whose version A received the given verdict.
    pub async fn visaed(&self, kind: VisaKind, comment: &str) -> Document {
        let document = self.diffused().await;
        IssueVisaHandler::new(
            self.documents.clone(),
            self.versions.clone(),
            self.visas.clone(),
            self.storage.clone(),
            self.roles.clone(),
            self.events.clone(),
            self.policy,
        )
        .handle(
            IssueVisaCommand {
                document_id: *document.id(),
                kind,
                comment: comment.to_string(),
                attachment: None,
            },
            as_user(moe()),
        )
        .await
        .unwrap()
        .document
    }
}

pub(crate) fn mandataire() -> UserId {
    UserId::new("mandataire-1").unwrap()
}

pub(crate) fn moe() -> UserId {
    UserId::new("moe-1").unwrap()
}

pub(crate) fn consultant() -> UserId {
    UserId::new("consultant-1").unwrap()
}

pub(crate) fn as_user(user: UserId) -> CommandMetadata {
    CommandMetadata::new(user).with_correlation_id("test-correlation")
}

fn injected(code: ErrorCode) -> DomainError {
    DomainError::new(code, "injected failure")
}

/// Version repository over the fixture's that fails chosen writes.
pub(crate) struct FaultyVersions {
    inner: Arc<InMemoryVersionRepository>,
    save_error: Option<ErrorCode>,
    status_error: Option<ErrorCode>,
    snapshot: Option<Version>,
}

impl FaultyVersions {
    pub fn over(inner: Arc<InMemoryVersionRepository>) -> Self {
        Self {
            inner,
            save_error: None,
            status_error: None,
            snapshot: None,
        }
    }

    pub fn failing_save(mut self, code: ErrorCode) -> Self {
        self.save_error = Some(code);
        self
    }

    pub fn failing_status(mut self, code: ErrorCode) -> Self {
        self.status_error = Some(code);
        self
    }

    /// Answer label lookups with `version` as it was when read, whatever is stored now.
    pub fn serving(mut self, version: Version) -> Self {
        self.snapshot = Some(version);
        self
    }
}

#[async_trait]
impl VersionRepository for FaultyVersions {
    async fn save(&self, version: &Version) -> Result<(), DomainError> {
        match self.save_error {
            Some(code) => Err(injected(code)),
            None => self.inner.save(version).await,
        }
    }

    async fn update(&self, version: &Version) -> Result<(), DomainError> {
        self.inner.update(version).await
    }

    async fn update_status(
        &self,
        version: &Version,
        expected: VersionStatus,
    ) -> Result<(), DomainError> {
        match self.status_error {
            Some(code) => Err(injected(code)),
            None => self.inner.update_status(version, expected).await,
        }
    }

    async fn delete(&self, id: &VersionId) -> Result<(), DomainError> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: &VersionId) -> Result<Option<Version>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_label(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Version>, DomainError> {
        match &self.snapshot {
            Some(v) if v.document_id() == document_id && v.label() == label => Ok(Some(v.clone())),
            _ => self.inner.find_by_label(document_id, label).await,
        }
    }

    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Version>, DomainError> {
        self.inner.list_by_document(document_id).await
    }
}

/// Document repository over the fixture's whose updates fail.
pub(crate) struct FaultyDocuments {
    inner: Arc<InMemoryDocumentRepository>,
    update_error: ErrorCode,
}

impl FaultyDocuments {
    pub fn over(inner: Arc<InMemoryDocumentRepository>, update_error: ErrorCode) -> Self {
        Self {
            inner,
            update_error,
        }
    }
}

#[async_trait]
impl DocumentRepository for FaultyDocuments {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        self.inner.save(document).await
    }

    async fn update(&self, _document: &Document) -> Result<(), DomainError> {
        Err(injected(self.update_error))
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_marche(
        &self,
        marche_id: &MarcheId,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<Document>, DomainError> {
        self.inner.list_by_marche(marche_id, status).await
    }
}

/// Visa repository over the fixture's whose writes fail.
pub(crate) struct FaultyVisas {
    inner: Arc<InMemoryVisaRepository>,
    write_error: ErrorCode,
}

impl FaultyVisas {
    pub fn over(inner: Arc<InMemoryVisaRepository>, write_error: ErrorCode) -> Self {
        Self { inner, write_error }
    }
}

#[async_trait]
impl VisaRepository for FaultyVisas {
    async fn save(&self, _visa: &Visa) -> Result<(), DomainError> {
        Err(injected(self.write_error))
    }

    async fn update(&self, _visa: &Visa) -> Result<(), DomainError> {
        Err(injected(self.write_error))
    }

    async fn find_pending(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Visa>, DomainError> {
        self.inner.find_pending(document_id, label).await
    }

    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Visa>, DomainError> {
        self.inner.list_by_document(document_id).await
    }
}
