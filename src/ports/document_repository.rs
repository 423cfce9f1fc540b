//! Document repository port.
//!
//! Defines the contract for persisting and retrieving Document aggregates.
//! Documents are scoped to a marché; listing is always per marché.

use async_trait::async_trait;

use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::{DocumentId, DomainError, MarcheId};

/// Repository port for Document aggregate persistence.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Save a new document.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, document: &Document) -> Result<(), DomainError>;

    /// Update an existing document (name, status, current version).
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, document: &Document) -> Result<(), DomainError>;

    /// Remove a document and, through the foreign keys, its versions and visas.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError>;

    /// Find a document by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// List the documents of a marché, optionally filtered by status.
    ///
    /// Returns documents ordered by created_at descending.
    async fn list_by_marche(
        &self,
        marche_id: &MarcheId,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<Document>, DomainError>;
}
