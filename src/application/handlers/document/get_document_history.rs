//! GetDocumentHistoryHandler - Query a document with all its versions and visas.

use std::sync::Arc;

use crate::domain::document::Document;
use crate::domain::foundation::{Capability, CommandMetadata, DocumentId, Timestamp};
use crate::domain::version::Version;
use crate::domain::visa::Visa;
use crate::domain::workflow::WorkflowError;
use crate::ports::{DocumentRepository, RoleDirectory, VersionRepository, VisaRepository};

use super::super::access::authorize;

/// Query for a document's full history.
#[derive(Debug, Clone)]
pub struct GetDocumentHistoryQuery {
    pub document_id: DocumentId,
}

/// A document, its versions ordered by label and its visas in request order.
#[derive(Debug, Clone)]
pub struct DocumentHistory {
    pub document: Document,
    pub versions: Vec<Version>,
    pub visas: Vec<Visa>,
}

impl DocumentHistory {
    /// The document's current version.
    pub fn current_version(&self) -> Option<&Version> {
        self.versions
            .iter()
            .find(|v| v.label() == self.document.current_version())
    }

    /// The visa request awaiting the MOE, if any.
    pub fn pending_visa(&self) -> Option<&Visa> {
        self.visas.iter().find(|v| v.is_pending())
    }

    /// Visas of one version.
    pub fn visas_for<'a>(&'a self, version: &'a Version) -> impl Iterator<Item = &'a Visa> + 'a {
        self.visas
            .iter()
            .filter(move |v| v.version_label() == version.label())
    }

    /// Whether the pending request is past its due date.
    pub fn is_overdue(&self, now: &Timestamp) -> bool {
        self.pending_visa().is_some_and(|v| v.is_overdue(now))
    }
}

/// Handler for history queries. Any role on the marché.
pub struct GetDocumentHistoryHandler {
    documents: Arc<dyn DocumentRepository>,
    versions: Arc<dyn VersionRepository>,
    visas: Arc<dyn VisaRepository>,
    roles: Arc<dyn RoleDirectory>,
}

impl GetDocumentHistoryHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        versions: Arc<dyn VersionRepository>,
        visas: Arc<dyn VisaRepository>,
        roles: Arc<dyn RoleDirectory>,
    ) -> Self {
        Self {
            documents,
            versions,
            visas,
            roles,
        }
    }

    pub async fn handle(
        &self,
        query: GetDocumentHistoryQuery,
        metadata: CommandMetadata,
    ) -> Result<DocumentHistory, WorkflowError> {
        let document = self
            .documents
            .find_by_id(&query.document_id)
            .await?
            .ok_or(WorkflowError::DocumentNotFound(query.document_id))?;
        authorize(
            self.roles.as_ref(),
            &metadata.user_id,
            document.marche_id(),
            Capability::Read,
        )
        .await?;

        let versions = self.versions.list_by_document(document.id()).await?;
        let visas = self.visas.list_by_document(document.id()).await?;

        Ok(DocumentHistory {
            document,
            versions,
            visas,
        })
    }
}
