//! VersionStatus enum for tracking the lifecycle of one document version.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Lifecycle status of a document version.
///
/// ```text
/// EnAttenteDiffusion ──diffuse──> EnAttenteVisa ──VSO──> Bpe
///                                       ├──────VAO──> ARemettreAJour
///                                       └──Refusé──> Refuse
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    /// Uploaded, not yet sent for review.
    #[default]
    EnAttenteDiffusion,
    /// Diffused, waiting for the MOE's visa.
    EnAttenteVisa,
    /// Bon pour exécution.
    Bpe,
    /// Approved with observations; superseded by a newer version.
    ARemettreAJour,
    /// Rejected.
    Refuse,
}

impl VersionStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [VersionStatus; 5] = [
        VersionStatus::EnAttenteDiffusion,
        VersionStatus::EnAttenteVisa,
        VersionStatus::Bpe,
        VersionStatus::ARemettreAJour,
        VersionStatus::Refuse,
    ];

    /// French label as stored in the `versions` table.
    pub fn as_label(&self) -> &'static str {
        match self {
            VersionStatus::EnAttenteDiffusion => "En attente de diffusion",
            VersionStatus::EnAttenteVisa => "En attente de visa",
            VersionStatus::Bpe => "BPE",
            VersionStatus::ARemettreAJour => "À remettre à jour",
            VersionStatus::Refuse => "Refusé",
        }
    }

    /// Parses a stored French label.
    pub fn from_label(label: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_label() == label)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "version_status",
                    format!("unknown version status '{}'", label),
                )
            })
    }

    /// Returns true while the version's file can still be replaced.
    pub fn accepts_upload(&self) -> bool {
        matches!(self, VersionStatus::EnAttenteDiffusion)
    }
}

impl StateMachine for VersionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use VersionStatus::*;
        matches!(
            (self, target),
            (EnAttenteDiffusion, EnAttenteVisa)
                | (EnAttenteVisa, Bpe)
                | (EnAttenteVisa, ARemettreAJour)
                | (EnAttenteVisa, Refuse)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use VersionStatus::*;
        match self {
            EnAttenteDiffusion => vec![EnAttenteVisa],
            EnAttenteVisa => vec![Bpe, ARemettreAJour, Refuse],
            Bpe | ARemettreAJour | Refuse => vec![],
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_awaiting_diffusion() {
        assert_eq!(VersionStatus::default(), VersionStatus::EnAttenteDiffusion);
    }

    #[test]
    fn diffusion_only_from_awaiting_diffusion() {
        for status in VersionStatus::ALL {
            let allowed = status.can_transition_to(&VersionStatus::EnAttenteVisa);
            assert_eq!(allowed, status == VersionStatus::EnAttenteDiffusion, "{:?}", status);
        }
    }

    #[test]
    fn decisions_only_from_awaiting_visa() {
        for target in [VersionStatus::Bpe, VersionStatus::ARemettreAJour, VersionStatus::Refuse] {
            for status in VersionStatus::ALL {
                assert_eq!(
                    status.can_transition_to(&target),
                    status == VersionStatus::EnAttenteVisa
                );
            }
        }
    }

    #[test]
    fn decided_statuses_are_terminal() {
        assert!(VersionStatus::Bpe.is_terminal());
        assert!(VersionStatus::ARemettreAJour.is_terminal());
        assert!(VersionStatus::Refuse.is_terminal());
        assert!(!VersionStatus::EnAttenteVisa.is_terminal());
    }

    #[test]
    fn can_transition_agrees_with_valid_transitions() {
        for from in VersionStatus::ALL {
            for to in VersionStatus::ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to)
                );
            }
        }
    }

    #[test]
    fn labels_roundtrip() {
        for status in VersionStatus::ALL {
            assert_eq!(VersionStatus::from_label(status.as_label()).unwrap(), status);
        }
        assert!(VersionStatus::from_label("Archivé").is_err());
    }

    #[test]
    fn only_awaiting_diffusion_accepts_upload() {
        assert!(VersionStatus::EnAttenteDiffusion.accepts_upload());
        assert!(!VersionStatus::EnAttenteVisa.accepts_upload());
    }
}
