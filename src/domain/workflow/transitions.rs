//! Pure workflow transitions over a document and its current version.
//!
//! These functions are the only place where document and version statuses
//! change together. They validate everything before mutating anything, so a
//! returned error always leaves both aggregates untouched.
//!
//! | Version status      | Verdict | Version becomes    | Document becomes          |
//! |---------------------|---------|--------------------|---------------------------|
//! | En attente de visa  | VSO     | BPE                | Validé                    |
//! | En attente de visa  | VAO     | À remettre à jour  | En attente de diffusion + next version |
//! | En attente de visa  | Refusé  | Refusé             | En attente de diffusion   |

use crate::domain::document::{Document, DocumentStatus};
use crate::domain::foundation::UserId;
use crate::domain::version::{Version, VersionLabel, VersionStatus};
use crate::domain::visa::{VisaComment, VisaKind};

use super::WorkflowError;

/// Result of applying a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisaOutcome {
    /// Verdict that was applied.
    pub kind: VisaKind,
    /// Label of the version that was reviewed.
    pub reviewed_label: VersionLabel,
    /// Status the reviewed version ended in.
    pub version_status: VersionStatus,
    /// Status the document ended in.
    pub document_status: DocumentStatus,
    /// Version opened automatically by a VAO.
    pub spawned: Option<Version>,
}

/// Returns the label following `label`, or `LabelExhausted`.
pub fn next_label(label: VersionLabel) -> Result<VersionLabel, WorkflowError> {
    label.next().ok_or(WorkflowError::LabelExhausted { label })
}

/// Send the current version out for review.
///
/// # Errors
///
/// - `VersionNotCurrent` if `version` is not the document's current version
/// - `VersionNotAwaitingDiffusion` if the version was already diffused or decided
/// - `DocumentNotAwaitingDiffusion` if the document is not awaiting diffusion
pub fn diffuse(document: &mut Document, version: &mut Version) -> Result<(), WorkflowError> {
    ensure_current(document, version)?;

    if version.status() != VersionStatus::EnAttenteDiffusion {
        return Err(WorkflowError::VersionNotAwaitingDiffusion {
            label: version.label(),
            status: version.status(),
        });
    }
    if document.status() != DocumentStatus::EnAttenteDiffusion {
        return Err(WorkflowError::DocumentNotAwaitingDiffusion {
            status: document.status(),
        });
    }

    version.transition_to(VersionStatus::EnAttenteVisa)?;
    document.transition_to(DocumentStatus::EnAttenteVisa)?;
    Ok(())
}

/// Apply the MOE's verdict to the current version.
///
/// A VAO also opens the next version (status "En attente de diffusion") and
/// makes it current; the caller persists it from `VisaOutcome::spawned`.
///
/// # Errors
///
/// - `VersionNotCurrent` if `version` is not the document's current version
/// - `VersionNotAwaitingVisa` if the version is not awaiting a visa
/// - `DocumentNotAwaitingVisa` if the document is not awaiting a visa
/// - `LabelExhausted` if a VAO is issued on version "Z"
pub fn apply_visa(
    document: &mut Document,
    version: &mut Version,
    comment: &VisaComment,
    issued_by: &UserId,
) -> Result<VisaOutcome, WorkflowError> {
    ensure_current(document, version)?;

    if version.status() != VersionStatus::EnAttenteVisa {
        return Err(WorkflowError::VersionNotAwaitingVisa {
            label: version.label(),
            status: version.status(),
        });
    }
    if !document.status().awaits_visa() {
        return Err(WorkflowError::DocumentNotAwaitingVisa {
            status: document.status(),
        });
    }

    let kind = comment.kind();
    let spawned_label = if kind.spawns_version() {
        Some(next_label(version.label())?)
    } else {
        None
    };

    version.transition_to(kind.version_outcome())?;
    document.transition_to(kind.document_outcome())?;

    let spawned = match spawned_label {
        Some(label) => {
            document.advance_version(label)?;
            Some(Version::new(*document.id(), label, issued_by.clone()))
        }
        None => None,
    };

    Ok(VisaOutcome {
        kind,
        reviewed_label: version.label(),
        version_status: version.status(),
        document_status: document.status(),
        spawned,
    })
}

/// Open the next version by hand after a refusal.
///
/// # Errors
///
/// - `VersionNotCurrent` if `current` is not the document's current version
/// - `DocumentNotAwaitingDiffusion` if the document is not awaiting diffusion
/// - `VersionNotRefused` unless the current version was refused
/// - `LabelExhausted` if the current version is "Z"
pub fn open_revision(
    document: &mut Document,
    current: &Version,
    created_by: UserId,
) -> Result<Version, WorkflowError> {
    ensure_current(document, current)?;

    if document.status() != DocumentStatus::EnAttenteDiffusion {
        return Err(WorkflowError::DocumentNotAwaitingDiffusion {
            status: document.status(),
        });
    }
    if current.status() != VersionStatus::Refuse {
        return Err(WorkflowError::VersionNotRefused {
            label: current.label(),
            status: current.status(),
        });
    }

    let label = next_label(current.label())?;
    document.advance_version(label)?;
    Ok(Version::new(*document.id(), label, created_by))
}

fn ensure_current(document: &Document, version: &Version) -> Result<(), WorkflowError> {
    if version.document_id() != document.id() {
        return Err(WorkflowError::VersionNotFound {
            document_id: *document.id(),
            label: version.label(),
        });
    }
    if version.label() != document.current_version() {
        return Err(WorkflowError::VersionNotCurrent {
            label: version.label(),
            current: document.current_version(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MarcheId;
    use crate::domain::workflow::VisaPolicy;

    fn mandataire() -> UserId {
        UserId::new("mandataire-1").unwrap()
    }

    fn moe() -> UserId {
        UserId::new("moe-1").unwrap()
    }

    fn fresh() -> (Document, Version) {
        let document = Document::new(
            MarcheId::new(),
            "Note de calcul structure".to_string(),
            "Note de calcul".to_string(),
            mandataire(),
        )
        .unwrap();
        let version = Version::new(*document.id(), VersionLabel::first(), mandataire());
        (document, version)
    }

    fn diffused() -> (Document, Version) {
        let (mut document, mut version) = fresh();
        diffuse(&mut document, &mut version).unwrap();
        (document, version)
    }

    fn comment(kind: VisaKind, text: &str) -> VisaComment {
        VisaPolicy::default().comment(kind, text).unwrap()
    }

    // Diffusion

    #[test]
    fn diffuse_moves_both_to_review() {
        let (document, version) = diffused();
        assert_eq!(document.status(), DocumentStatus::EnAttenteVisa);
        assert_eq!(version.status(), VersionStatus::EnAttenteVisa);
    }

    #[test]
    fn diffuse_twice_is_rejected() {
        let (mut document, mut version) = diffused();
        let err = diffuse(&mut document, &mut version).unwrap_err();
        assert!(matches!(err, WorkflowError::VersionNotAwaitingDiffusion { .. }));
    }

    #[test]
    fn diffuse_rejects_foreign_version() {
        let (mut document, _) = fresh();
        let mut other = Version::new(
            crate::domain::foundation::DocumentId::new(),
            VersionLabel::first(),
            mandataire(),
        );
        let err = diffuse(&mut document, &mut other).unwrap_err();
        assert!(matches!(err, WorkflowError::VersionNotFound { .. }));
        assert_eq!(document.status(), DocumentStatus::EnAttenteDiffusion);
    }

    #[test]
    fn diffuse_rejects_stale_version() {
        let (mut document, mut version) = diffused();
        apply_visa(&mut document, &mut version, &comment(VisaKind::Vao, "reprendre"), &moe())
            .unwrap();
        let err = diffuse(&mut document, &mut version).unwrap_err();
        assert!(matches!(err, WorkflowError::VersionNotCurrent { .. }));
    }

    // Visa

    #[test]
    fn vso_validates() {
        let (mut document, mut version) = diffused();
        let outcome =
            apply_visa(&mut document, &mut version, &comment(VisaKind::Vso, ""), &moe()).unwrap();

        assert_eq!(outcome.version_status, VersionStatus::Bpe);
        assert_eq!(outcome.document_status, DocumentStatus::Valide);
        assert!(outcome.spawned.is_none());
        assert_eq!(document.current_version(), VersionLabel::first());
    }

    #[test]
    fn vao_spawns_next_version() {
        let (mut document, mut version) = diffused();
        let outcome = apply_visa(
            &mut document,
            &mut version,
            &comment(VisaKind::Vao, "compléter les cotes"),
            &moe(),
        )
        .unwrap();

        assert_eq!(version.status(), VersionStatus::ARemettreAJour);
        assert_eq!(document.status(), DocumentStatus::EnAttenteDiffusion);

        let spawned = outcome.spawned.unwrap();
        assert_eq!(spawned.label().to_string(), "B");
        assert_eq!(spawned.status(), VersionStatus::EnAttenteDiffusion);
        assert_eq!(spawned.document_id(), document.id());
        assert_eq!(document.current_version(), spawned.label());
    }

    #[test]
    fn refuse_sends_document_back_without_new_version() {
        let (mut document, mut version) = diffused();
        let outcome = apply_visa(
            &mut document,
            &mut version,
            &comment(VisaKind::Refuse, "hors programme"),
            &moe(),
        )
        .unwrap();

        assert_eq!(outcome.version_status, VersionStatus::Refuse);
        assert_eq!(outcome.document_status, DocumentStatus::EnAttenteDiffusion);
        assert!(outcome.spawned.is_none());
        assert_eq!(document.current_version(), VersionLabel::first());
    }

    #[test]
    fn visa_before_diffusion_is_rejected() {
        let (mut document, mut version) = fresh();
        let err = apply_visa(&mut document, &mut version, &comment(VisaKind::Vso, ""), &moe())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::VersionNotAwaitingVisa { .. }));
    }

    #[test]
    fn second_visa_on_same_version_is_rejected() {
        let (mut document, mut version) = diffused();
        apply_visa(&mut document, &mut version, &comment(VisaKind::Vso, ""), &moe()).unwrap();
        let err = apply_visa(&mut document, &mut version, &comment(VisaKind::Vso, ""), &moe())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::VersionNotAwaitingVisa { .. }));
    }

    #[test]
    fn vao_on_z_fails_without_mutating() {
        let (document, _) = fresh();
        let z = VersionLabel::LAST;
        let mut document = Document::reconstitute(
            *document.id(),
            *document.marche_id(),
            document.name().to_string(),
            document.doc_type().to_string(),
            z,
            DocumentStatus::EnAttenteVisa,
            mandataire(),
            *document.created_at(),
            *document.updated_at(),
        );
        let mut version = Version::reconstitute(
            crate::domain::foundation::VersionId::new(),
            *document.id(),
            z,
            VersionStatus::EnAttenteVisa,
            None,
            mandataire(),
            *document.created_at(),
            *document.updated_at(),
        );

        let err = apply_visa(
            &mut document,
            &mut version,
            &comment(VisaKind::Vao, "encore une reprise"),
            &moe(),
        )
        .unwrap_err();

        assert!(matches!(err, WorkflowError::LabelExhausted { .. }));
        assert_eq!(version.status(), VersionStatus::EnAttenteVisa);
        assert_eq!(document.status(), DocumentStatus::EnAttenteVisa);
    }

    // Manual revision

    #[test]
    fn revision_follows_refusal() {
        let (mut document, mut version) = diffused();
        apply_visa(
            &mut document,
            &mut version,
            &comment(VisaKind::Refuse, "hors programme"),
            &moe(),
        )
        .unwrap();

        let next = open_revision(&mut document, &version, mandataire()).unwrap();
        assert_eq!(next.label().to_string(), "B");
        assert_eq!(next.status(), VersionStatus::EnAttenteDiffusion);
        assert_eq!(document.current_version(), next.label());
    }

    #[test]
    fn revision_requires_refused_version() {
        let (mut document, version) = fresh();
        let err = open_revision(&mut document, &version, mandataire()).unwrap_err();
        assert!(matches!(err, WorkflowError::VersionNotRefused { .. }));
    }

    #[test]
    fn revision_not_allowed_during_review() {
        let (mut document, version) = diffused();
        let err = open_revision(&mut document, &version, mandataire()).unwrap_err();
        assert!(matches!(err, WorkflowError::DocumentNotAwaitingDiffusion { .. }));
    }

    #[test]
    fn next_label_fails_after_z() {
        assert!(matches!(
            next_label(VersionLabel::LAST),
            Err(WorkflowError::LabelExhausted { .. })
        ));
        assert_eq!(next_label(VersionLabel::first()).unwrap().to_string(), "B");
    }
}
