//! Workflow domain events.
//!
//! - `DocumentCreated` - New document with its first version
//! - `VersionCreated` - Version opened (initial, after VAO, or after refusal)
//! - `VersionFileAttached` - File uploaded to a version awaiting diffusion
//! - `DocumentDiffused` - Current version sent to the MOE
//! - `VisaIssued` - MOE verdict recorded

use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentStatus;
use crate::domain::foundation::{
    domain_event, DocumentId, EventId, MarcheId, Timestamp, UserId, VersionId, VisaId,
};
use crate::domain::version::{VersionLabel, VersionStatus};
use crate::domain::visa::{VisaDecision, VisaKind};

// ════════════════════════════════════════════════════════════════════════════
// DocumentCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a mandataire registers a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCreated {
    pub event_id: EventId,
    pub document_id: DocumentId,
    pub marche_id: MarcheId,
    pub name: String,
    pub doc_type: String,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

domain_event!(
    DocumentCreated,
    event_type = "document.created.v1",
    aggregate_id = document_id,
    aggregate_type = "Document",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VersionCreated
// ════════════════════════════════════════════════════════════════════════════

/// Why a version was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrigin {
    /// First version of a new document.
    Initial,
    /// Opened automatically by a VAO.
    Observations,
    /// Opened by hand after a refusal.
    Revision,
}

/// Published whenever a version row is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionCreated {
    pub event_id: EventId,
    pub version_id: VersionId,
    pub document_id: DocumentId,
    pub label: VersionLabel,
    pub origin: VersionOrigin,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

domain_event!(
    VersionCreated,
    event_type = "version.created.v1",
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VersionFileAttached
// ════════════════════════════════════════════════════════════════════════════

/// Published when a file is uploaded to a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionFileAttached {
    pub event_id: EventId,
    pub version_id: VersionId,
    pub document_id: DocumentId,
    pub label: VersionLabel,
    pub location: String,
    pub checksum: String,
    pub size_bytes: u64,
    pub replaced_previous: bool,
    pub attached_at: Timestamp,
}

domain_event!(
    VersionFileAttached,
    event_type = "version.file_attached.v1",
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = attached_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// DocumentDiffused
// ════════════════════════════════════════════════════════════════════════════

/// Published when the current version is sent for visa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDiffused {
    pub event_id: EventId,
    pub document_id: DocumentId,
    pub marche_id: MarcheId,
    pub label: VersionLabel,
    pub visa_id: VisaId,
    pub due_at: Option<Timestamp>,
    pub diffused_by: UserId,
    pub diffused_at: Timestamp,
}

domain_event!(
    DocumentDiffused,
    event_type = "document.diffused.v1",
    aggregate_id = document_id,
    aggregate_type = "Document",
    occurred_at = diffused_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VisaIssued
// ════════════════════════════════════════════════════════════════════════════

/// Published when the MOE issues a verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisaIssued {
    pub event_id: EventId,
    pub visa_id: VisaId,
    pub document_id: DocumentId,
    pub marche_id: MarcheId,
    pub label: VersionLabel,
    pub kind: VisaKind,
    pub decision: VisaDecision,
    pub comment: String,
    pub version_status: VersionStatus,
    pub document_status: DocumentStatus,
    pub spawned_label: Option<VersionLabel>,
    pub issued_by: UserId,
    pub issued_at: Timestamp,
}

domain_event!(
    VisaIssued,
    event_type = "visa.issued.v1",
    aggregate_id = visa_id,
    aggregate_type = "Visa",
    occurred_at = issued_at,
    event_id = event_id
);
