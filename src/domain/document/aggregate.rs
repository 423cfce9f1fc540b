//! Document aggregate entity.
//!
//! A document belongs to one marché and points at its current version by
//! label. Versions themselves live in the version module.

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, MarcheId, StateMachine, Timestamp, UserId,
};
use crate::domain::version::VersionLabel;
use serde::{Deserialize, Serialize};

use super::DocumentStatus;

/// Maximum length for document names.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for the free-text document type.
pub const MAX_TYPE_LENGTH: usize = 100;

/// Document aggregate - a deliverable tracked through review.
///
/// # Invariants
///
/// - `name` is 1-255 characters, non-blank
/// - `current_version` only moves forward
/// - status changes go through `DocumentStatus` transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    marche_id: MarcheId,
    name: String,
    doc_type: String,
    current_version: VersionLabel,
    status: DocumentStatus,
    created_by: UserId,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Document {
    /// Create a new document whose first version is "A".
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if name or type is blank or too long
    pub fn new(
        marche_id: MarcheId,
        name: String,
        doc_type: String,
        created_by: UserId,
    ) -> Result<Self, DomainError> {
        Self::validate_text("name", &name, MAX_NAME_LENGTH)?;
        Self::validate_text("doc_type", &doc_type, MAX_TYPE_LENGTH)?;

        let now = Timestamp::now();
        Ok(Self {
            id: DocumentId::new(),
            marche_id,
            name: name.trim().to_string(),
            doc_type: doc_type.trim().to_string(),
            current_version: VersionLabel::first(),
            status: DocumentStatus::EnAttenteDiffusion,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a document from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DocumentId,
        marche_id: MarcheId,
        name: String,
        doc_type: String,
        current_version: VersionLabel,
        status: DocumentStatus,
        created_by: UserId,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            marche_id,
            name,
            doc_type,
            current_version,
            status,
            created_by,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn marche_id(&self) -> &MarcheId {
        &self.marche_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn current_version(&self) -> VersionLabel {
        self.current_version
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
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

    /// Rename the document, returning the old name.
    pub fn rename(&mut self, new_name: String) -> Result<String, DomainError> {
        Self::validate_text("name", &new_name, MAX_NAME_LENGTH)?;
        let old = std::mem::replace(&mut self.name, new_name.trim().to_string());
        self.updated_at = Timestamp::now();
        Ok(old)
    }

    /// Move the document to `target`, returning the previous status.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the move is not allowed
    pub fn transition_to(&mut self, target: DocumentStatus) -> Result<DocumentStatus, DomainError> {
        let next = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Document '{}' cannot go from '{}' to '{}'",
                    self.name, self.status, target
                ),
            )
            .with_detail("document_id", self.id.to_string())
        })?;
        let previous = std::mem::replace(&mut self.status, next);
        self.updated_at = Timestamp::now();
        Ok(previous)
    }

    /// Point the document at a newer version.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the document awaits diffusion
    /// - `ValidationFailed` if `label` does not come after the current one
    pub fn advance_version(&mut self, label: VersionLabel) -> Result<(), DomainError> {
        if self.status != DocumentStatus::EnAttenteDiffusion {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Document '{}' is '{}'; a new version can only follow a review",
                    self.name, self.status
                ),
            ));
        }
        if label <= self.current_version {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Version {} does not follow current version {}",
                    label, self.current_version
                ),
            )
            .with_detail("field", "version_label"));
        }
        self.current_version = label;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("{} cannot be empty", field),
            )
            .with_detail("field", field));
        }
        if trimmed.chars().count() > max {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("{} must be {} characters or less", field, max),
            )
            .with_detail("field", field));
        }
        Ok(())
    }
}
