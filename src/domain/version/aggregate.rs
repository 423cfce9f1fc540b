//! Version aggregate entity.
//!
//! A version is one submitted revision of a document. Versions reference
//! their document by ID; the document in turn only remembers the label of
//! its current version.

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, StateMachine, StoredFile, Timestamp, UserId, VersionId,
};
use serde::{Deserialize, Serialize};

use super::{VersionLabel, VersionStatus};

/// Version aggregate - one lettered revision of a document.
///
/// # Invariants
///
/// - `label` never changes after creation
/// - `status` only changes through `VersionStatus` transitions
/// - `file` can only be (re)attached while awaiting diffusion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    id: VersionId,
    document_id: DocumentId,
    label: VersionLabel,
    status: VersionStatus,
    file: Option<StoredFile>,
    created_by: UserId,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Version {
    /// Create a new version awaiting diffusion.
    pub fn new(document_id: DocumentId, label: VersionLabel, created_by: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            id: VersionId::new(),
            document_id,
            label,
            status: VersionStatus::EnAttenteDiffusion,
            file: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a version from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: VersionId,
        document_id: DocumentId,
        label: VersionLabel,
        status: VersionStatus,
        file: Option<StoredFile>,
        created_by: UserId,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            document_id,
            label,
            status,
            file,
            created_by,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &VersionId {
        &self.id
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn label(&self) -> VersionLabel {
        self.label
    }

    pub fn status(&self) -> VersionStatus {
        self.status
    }

    pub fn file(&self) -> Option<&StoredFile> {
        self.file.as_ref()
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Move the version to `target`, validating against the state machine.
    ///
    /// Returns the previous status.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the move is not allowed
    pub fn transition_to(&mut self, target: VersionStatus) -> Result<VersionStatus, DomainError> {
        let next = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Version {} cannot go from '{}' to '{}'",
                    self.label, self.status, target
                ),
            )
            .with_detail("version_id", self.id.to_string())
        })?;
        let previous = std::mem::replace(&mut self.status, next);
        self.updated_at = Timestamp::now();
        Ok(previous)
    }

    /// Attach (or replace) the version's file.
    ///
    /// Returns the file it replaced, if any.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` once the version has been diffused
    pub fn attach_file(&mut self, file: StoredFile) -> Result<Option<StoredFile>, DomainError> {
        if !self.status.accepts_upload() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Version {} is '{}' and no longer accepts files",
                    self.label, self.status
                ),
            ));
        }
        let previous = self.file.replace(file);
        self.updated_at = Timestamp::now();
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Bucket;

    fn author() -> UserId {
        UserId::new("mandataire-1").unwrap()
    }

    fn plan(name: &str) -> StoredFile {
        StoredFile {
            bucket: Bucket::Documents,
            key: format!("k/{}", name),
            file_name: name.to_string(),
            size_bytes: 3,
            checksum: "00".to_string(),
        }
    }

    #[test]
    fn new_version_awaits_diffusion_without_file() {
        let version = Version::new(DocumentId::new(), VersionLabel::first(), author());
        assert_eq!(version.status(), VersionStatus::EnAttenteDiffusion);
        assert!(version.file().is_none());
        assert_eq!(version.label().to_string(), "A");
    }

    #[test]
    fn transition_returns_previous_status() {
        let mut version = Version::new(DocumentId::new(), VersionLabel::first(), author());
        let previous = version.transition_to(VersionStatus::EnAttenteVisa).unwrap();
        assert_eq!(previous, VersionStatus::EnAttenteDiffusion);
        assert_eq!(version.status(), VersionStatus::EnAttenteVisa);
    }

    #[test]
    fn invalid_transition_is_rejected_and_status_kept() {
        let mut version = Version::new(DocumentId::new(), VersionLabel::first(), author());
        let err = version.transition_to(VersionStatus::Bpe).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(version.status(), VersionStatus::EnAttenteDiffusion);
    }

    #[test]
    fn attach_file_replaces_previous_upload() {
        let mut version = Version::new(DocumentId::new(), VersionLabel::first(), author());
        assert!(version.attach_file(plan("v1.pdf")).unwrap().is_none());
        let replaced = version.attach_file(plan("v2.pdf")).unwrap();
        assert_eq!(replaced.unwrap().file_name, "v1.pdf");
        assert_eq!(version.file().unwrap().file_name, "v2.pdf");
    }

    #[test]
    fn attach_file_fails_after_diffusion() {
        let mut version = Version::new(DocumentId::new(), VersionLabel::first(), author());
        version.transition_to(VersionStatus::EnAttenteVisa).unwrap();
        assert!(version.attach_file(plan("late.pdf")).is_err());
    }
}
