//! Visa aggregate entity.
//!
//! A visa record is opened as a pending request when a version is diffused
//! and closed when the MOE issues a verdict on that same version.

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, StoredFile, Timestamp, UserId, VisaId,
};
use crate::domain::version::VersionLabel;
use serde::{Deserialize, Serialize};

use super::{VisaComment, VisaDecision, VisaKind};

/// Visa aggregate - request and response for one document version.
///
/// # Invariants
///
/// - a pending visa has no comment, issuer or attachment
/// - an issued visa's decision matches its comment kind
/// - once issued, a visa cannot be issued again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visa {
    id: VisaId,
    document_id: DocumentId,
    version_label: VersionLabel,
    requested_by: UserId,
    requested_at: Timestamp,
    due_at: Option<Timestamp>,
    decision: VisaDecision,
    comment: Option<VisaComment>,
    attachment: Option<StoredFile>,
    issued_by: Option<UserId>,
    issued_at: Option<Timestamp>,
}

impl Visa {
    /// Open a pending visa request for a diffused version.
    pub fn request(
        document_id: DocumentId,
        version_label: VersionLabel,
        requested_by: UserId,
        due_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id: VisaId::new(),
            document_id,
            version_label,
            requested_by,
            requested_at: Timestamp::now(),
            due_at,
            decision: VisaDecision::Pending,
            comment: None,
            attachment: None,
            issued_by: None,
            issued_at: None,
        }
    }

    /// Reconstitute a visa from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: VisaId,
        document_id: DocumentId,
        version_label: VersionLabel,
        requested_by: UserId,
        requested_at: Timestamp,
        due_at: Option<Timestamp>,
        decision: VisaDecision,
        comment: Option<VisaComment>,
        attachment: Option<StoredFile>,
        issued_by: Option<UserId>,
        issued_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            document_id,
            version_label,
            requested_by,
            requested_at,
            due_at,
            decision,
            comment,
            attachment,
            issued_by,
            issued_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &VisaId {
        &self.id
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn version_label(&self) -> VersionLabel {
        self.version_label
    }

    pub fn requested_by(&self) -> &UserId {
        &self.requested_by
    }

    pub fn requested_at(&self) -> &Timestamp {
        &self.requested_at
    }

    pub fn due_at(&self) -> Option<&Timestamp> {
        self.due_at.as_ref()
    }

    pub fn decision(&self) -> VisaDecision {
        self.decision
    }

    pub fn comment(&self) -> Option<&VisaComment> {
        self.comment.as_ref()
    }

    /// Kind of the issued verdict, if any.
    pub fn kind(&self) -> Option<VisaKind> {
        self.comment.as_ref().map(VisaComment::kind)
    }

    pub fn attachment(&self) -> Option<&StoredFile> {
        self.attachment.as_ref()
    }

    pub fn issued_by(&self) -> Option<&UserId> {
        self.issued_by.as_ref()
    }

    pub fn issued_at(&self) -> Option<&Timestamp> {
        self.issued_at.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.decision.is_pending()
    }

    /// A pending request past its due date.
    pub fn is_overdue(&self, now: &Timestamp) -> bool {
        self.is_pending() && self.due_at.is_some_and(|due| now.is_after(&due))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the MOE's verdict.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the visa was already issued
    pub fn issue(
        &mut self,
        comment: VisaComment,
        issued_by: UserId,
        attachment: Option<StoredFile>,
    ) -> Result<(), DomainError> {
        if !self.is_pending() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Visa for version {} was already issued ({})",
                    self.version_label, self.decision
                ),
            )
            .with_detail("visa_id", self.id.to_string()));
        }
        self.decision = comment.kind().decision();
        self.comment = Some(comment);
        self.attachment = attachment;
        self.issued_by = Some(issued_by);
        self.issued_at = Some(Timestamp::now());
        Ok(())
    }
}
