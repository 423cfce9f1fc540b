//! Version repository port.
//!
//! Versions are addressed either by ID or by `(document, label)`, which is
//! unique. Status updates go through a compare-and-set so that two visas
//! submitted at the same time cannot both be applied to one version.

use async_trait::async_trait;

use crate::domain::foundation::{DocumentId, DomainError, VersionId};
use crate::domain::version::{Version, VersionLabel, VersionStatus};

/// Repository port for Version persistence.
#[async_trait]
pub trait VersionRepository: Send + Sync {
    /// Save a new version.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the document already has a version with this label
    /// - `DatabaseError` on persistence failure
    async fn save(&self, version: &Version) -> Result<(), DomainError>;

    /// Persist the file reference and timestamps of an existing version.
    ///
    /// The status is never written here; the write only applies while the
    /// stored status still equals `version.status()`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored status changed since the read
    /// - `VersionNotFound` if the version doesn't exist
    async fn update(&self, version: &Version) -> Result<(), DomainError>;

    /// Persist `version`'s status only if the stored status is still `expected`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored status differs from `expected`
    /// - `VersionNotFound` if the version doesn't exist
    async fn update_status(
        &self,
        version: &Version,
        expected: VersionStatus,
    ) -> Result<(), DomainError>;

    /// Remove a version. Only used to undo a save whose workflow step failed.
    ///
    /// # Errors
    ///
    /// - `VersionNotFound` if the version doesn't exist
    async fn delete(&self, id: &VersionId) -> Result<(), DomainError>;

    /// Find a version by its ID.
    async fn find_by_id(&self, id: &VersionId) -> Result<Option<Version>, DomainError>;

    /// Find a version by document and label.
    async fn find_by_label(
        &self,
        document_id: &DocumentId,
        label: VersionLabel,
    ) -> Result<Option<Version>, DomainError>;

    /// All versions of a document, ordered by label.
    async fn list_by_document(&self, document_id: &DocumentId) -> Result<Vec<Version>, DomainError>;
}
