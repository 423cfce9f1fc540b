//! DocumentStatus enum for tracking where a document stands in review.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Review status of a document as a whole.
///
/// Valid transitions:
/// - EnAttenteDiffusion -> EnAttenteVisa (diffusion)
/// - EnAttenteVisa -> Valide (VSO)
/// - EnAttenteVisa -> EnAttenteDiffusion (VAO or Refusé)
///
/// `Refuse` is accepted from storage but no workflow action produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    EnAttenteDiffusion,
    EnAttenteVisa,
    Valide,
    Refuse,
}

impl DocumentStatus {
    /// All statuses.
    pub const ALL: [DocumentStatus; 4] = [
        DocumentStatus::EnAttenteDiffusion,
        DocumentStatus::EnAttenteVisa,
        DocumentStatus::Valide,
        DocumentStatus::Refuse,
    ];

    /// French label as stored in the `documents` table.
    pub fn as_label(&self) -> &'static str {
        match self {
            DocumentStatus::EnAttenteDiffusion => "En attente de diffusion",
            DocumentStatus::EnAttenteVisa => "En attente de validation",
            DocumentStatus::Valide => "Validé",
            DocumentStatus::Refuse => "Refusé",
        }
    }

    /// Parses a stored French label.
    pub fn from_label(label: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_label() == label)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "document_status",
                    format!("unknown document status '{}'", label),
                )
            })
    }

    /// Returns true if the document is waiting for the MOE.
    pub fn awaits_visa(&self) -> bool {
        matches!(self, DocumentStatus::EnAttenteVisa)
    }
}

impl StateMachine for DocumentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, target),
            (EnAttenteDiffusion, EnAttenteVisa)
                | (EnAttenteVisa, Valide)
                | (EnAttenteVisa, EnAttenteDiffusion)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DocumentStatus::*;
        match self {
            EnAttenteDiffusion => vec![EnAttenteVisa],
            EnAttenteVisa => vec![Valide, EnAttenteDiffusion],
            Valide | Refuse => vec![],
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}
