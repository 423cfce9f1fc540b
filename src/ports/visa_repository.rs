//! Visa repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DocumentId, DomainError};
use crate::domain::version::VersionLabel;
use crate::domain::visa::Visa;

/// Repository port for Visa persistence.
#[async_trait]
pub trait VisaRepository: Send + Sync {
    /// Save a new visa (pending request or issued verdict).
    async fn save(&self, visa: &Visa) -> Result<(), DomainError>;

    /// Update an existing visa.
    ///
    /// # Errors
    ///
    /// - `VisaNotFound` if the visa doesn't exist
    async fn update(&self, visa: &Visa) -> Result<(), DomainError>;

    /// The pending request for a given version, if any.
    async fn find_pending(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Visa>, DomainError>;

    /// All visas of a document, oldest request first.
    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Visa>, DomainError>;
}
