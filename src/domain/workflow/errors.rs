//! Workflow-specific error types.

use thiserror::Error;

use crate::domain::document::DocumentStatus;
use crate::domain::foundation::{
    Capability, DocumentId, DomainError, ErrorCode, ValidationError,
};
use crate::domain::version::{VersionLabel, VersionStatus};

/// Errors raised by workflow operations and the handlers that drive them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Version {label} of document {document_id} not found")]
    VersionNotFound {
        document_id: DocumentId,
        label: VersionLabel,
    },

    #[error("User has no role on this marché")]
    NotAMember,

    #[error("Role does not allow '{}'", .capability.as_str())]
    Forbidden { capability: Capability },

    #[error("Version {label} is not the current version (current is {current})")]
    VersionNotCurrent {
        label: VersionLabel,
        current: VersionLabel,
    },

    #[error("Document is '{status}', expected 'En attente de diffusion'")]
    DocumentNotAwaitingDiffusion { status: DocumentStatus },

    #[error("Document is '{status}', expected 'En attente de validation'")]
    DocumentNotAwaitingVisa { status: DocumentStatus },

    #[error("Version {label} is '{status}', expected 'En attente de diffusion'")]
    VersionNotAwaitingDiffusion {
        label: VersionLabel,
        status: VersionStatus,
    },

    #[error("Version {label} is '{status}', expected 'En attente de visa'")]
    VersionNotAwaitingVisa {
        label: VersionLabel,
        status: VersionStatus,
    },

    #[error("Version {label} is '{status}'; only a refused version can be revised by hand")]
    VersionNotRefused {
        label: VersionLabel,
        status: VersionStatus,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No version label left after {label}")]
    LabelExhausted { label: VersionLabel },

    #[error("Invalid comment: {0}")]
    InvalidComment(ValidationError),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl WorkflowError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::DocumentNotFound(_) => ErrorCode::DocumentNotFound,
            WorkflowError::VersionNotFound { .. } => ErrorCode::VersionNotFound,
            WorkflowError::NotAMember | WorkflowError::Forbidden { .. } => ErrorCode::Forbidden,
            WorkflowError::VersionNotCurrent { .. }
            | WorkflowError::DocumentNotAwaitingDiffusion { .. }
            | WorkflowError::DocumentNotAwaitingVisa { .. }
            | WorkflowError::VersionNotAwaitingDiffusion { .. }
            | WorkflowError::VersionNotAwaitingVisa { .. }
            | WorkflowError::VersionNotRefused { .. }
            | WorkflowError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            WorkflowError::LabelExhausted { .. } => ErrorCode::LabelExhausted,
            WorkflowError::InvalidComment(_) | WorkflowError::ValidationFailed { .. } => {
                ErrorCode::ValidationFailed
            }
            WorkflowError::ConcurrentModification(_) => ErrorCode::ConcurrentModification,
            WorkflowError::Storage(_) => ErrorCode::StorageError,
            WorkflowError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Short French message suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::DocumentNotFound(_) => "Document introuvable.".to_string(),
            WorkflowError::VersionNotFound { label, .. } => {
                format!("La version {} est introuvable.", label)
            }
            WorkflowError::NotAMember => "Vous n'avez aucun droit sur ce marché.".to_string(),
            WorkflowError::Forbidden { capability } => match capability {
                Capability::Submit => {
                    "Seul le mandataire peut déposer ou diffuser un document.".to_string()
                }
                Capability::IssueVisa => "Seul le MOE peut viser un document.".to_string(),
                Capability::Read => "Accès refusé.".to_string(),
            },
            WorkflowError::VersionNotCurrent { current, .. } => {
                format!("Seule la version courante ({}) peut être traitée.", current)
            }
            WorkflowError::DocumentNotAwaitingDiffusion { status }
            | WorkflowError::DocumentNotAwaitingVisa { status } => {
                format!("Action impossible : le document est « {} ».", status)
            }
            WorkflowError::VersionNotAwaitingDiffusion { label, status } => format!(
                "La version {} ne peut pas être diffusée : elle est « {} ».",
                label, status
            ),
            WorkflowError::VersionNotAwaitingVisa { label, status } => format!(
                "La version {} ne peut pas être visée : elle est « {} ».",
                label, status
            ),
            WorkflowError::VersionNotRefused { label, .. } => format!(
                "Une nouvelle version ne peut suivre la version {} que si elle a été refusée.",
                label
            ),
            WorkflowError::InvalidState(_) => {
                "Action impossible dans l'état actuel du document.".to_string()
            }
            WorkflowError::LabelExhausted { label } => format!(
                "Impossible de créer une version après la version {}.",
                label
            ),
            WorkflowError::InvalidComment(err) => match err {
                ValidationError::EmptyField { .. } => {
                    "Un commentaire est obligatoire pour ce type de visa.".to_string()
                }
                ValidationError::OutOfRange { min, max, .. } => format!(
                    "Le commentaire doit contenir entre {} et {} caractères.",
                    min, max
                ),
                ValidationError::InvalidFormat { .. } => "Commentaire invalide.".to_string(),
            },
            WorkflowError::ValidationFailed { field, .. } => {
                format!("Champ « {} » invalide.", field)
            }
            WorkflowError::ConcurrentModification(_) => {
                "Le document a été modifié entre-temps, veuillez recharger la page.".to_string()
            }
            WorkflowError::Storage(_) => "Erreur lors de l'envoi du fichier.".to_string(),
            WorkflowError::Infrastructure(_) => {
                "Une erreur est survenue, veuillez réessayer.".to_string()
            }
        }
    }
}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => WorkflowError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => WorkflowError::InvalidState(err.message),
            ErrorCode::ConcurrentModification => WorkflowError::ConcurrentModification(err.message),
            ErrorCode::StorageError => WorkflowError::Storage(err.message),
            _ => WorkflowError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
