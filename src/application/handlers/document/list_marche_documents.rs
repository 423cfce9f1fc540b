//! ListMarcheDocumentsHandler - Query the documents of a marché.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::{Capability, CommandMetadata, MarcheId};
use crate::domain::workflow::WorkflowError;
use crate::ports::{DocumentRepository, RoleDirectory};

use super::super::access::authorize;

/// Query for a marché's documents.
#[derive(Debug, Clone)]
pub struct ListMarcheDocumentsQuery {
    pub marche_id: MarcheId,
    pub status: Option<DocumentStatus>,
}

/// Handler for listing documents. Any role on the marché.
pub struct ListMarcheDocumentsHandler {
    documents: Arc<dyn DocumentRepository>,
    roles: Arc<dyn RoleDirectory>,
}

impl ListMarcheDocumentsHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>, roles: Arc<dyn RoleDirectory>) -> Self {
        Self { documents, roles }
    }

    pub async fn handle(
        &self,
        query: ListMarcheDocumentsQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<Document>, WorkflowError> {
        authorize(
            self.roles.as_ref(),
            &metadata.user_id,
            &query.marche_id,
            Capability::Read,
        )
        .await?;

        Ok(self
            .documents
            .list_by_marche(&query.marche_id, query.status)
            .await?)
    }
}
