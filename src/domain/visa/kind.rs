//! Visa kinds (what the MOE decided) and the stored decision value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::document::DocumentStatus;
use crate::domain::foundation::ValidationError;
use crate::domain::version::VersionStatus;

/// The MOE's verdict on a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaKind {
    /// Visa sans observation.
    Vso,
    /// Visa avec observations: approved, but a revised version is expected.
    Vao,
    /// Refusé.
    Refuse,
}

impl VisaKind {
    /// All kinds.
    pub const ALL: [VisaKind; 3] = [VisaKind::Vso, VisaKind::Vao, VisaKind::Refuse];

    /// Prefix written in front of the comment text.
    pub fn prefix(&self) -> &'static str {
        match self {
            VisaKind::Vso => "VSO",
            VisaKind::Vao => "VAO",
            VisaKind::Refuse => "Refusé",
        }
    }

    /// Stored decision for this kind.
    pub fn decision(&self) -> VisaDecision {
        match self {
            VisaKind::Vso | VisaKind::Vao => VisaDecision::Approved,
            VisaKind::Refuse => VisaDecision::Rejected,
        }
    }

    /// VAO and Refusé must explain themselves.
    pub fn requires_comment(&self) -> bool {
        !matches!(self, VisaKind::Vso)
    }

    /// Status the reviewed version ends in.
    pub fn version_outcome(&self) -> VersionStatus {
        match self {
            VisaKind::Vso => VersionStatus::Bpe,
            VisaKind::Vao => VersionStatus::ARemettreAJour,
            VisaKind::Refuse => VersionStatus::Refuse,
        }
    }

    /// Status the document ends in.
    pub fn document_outcome(&self) -> DocumentStatus {
        match self {
            VisaKind::Vso => DocumentStatus::Valide,
            VisaKind::Vao | VisaKind::Refuse => DocumentStatus::EnAttenteDiffusion,
        }
    }

    /// VAO is the only verdict that opens the next version automatically.
    pub fn spawns_version(&self) -> bool {
        matches!(self, VisaKind::Vao)
    }

    /// Parses a comment prefix ("VSO", "VAO", "Refusé").
    pub fn from_prefix(prefix: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.prefix().eq_ignore_ascii_case(prefix.trim()))
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "visa_kind",
                    format!("unknown visa prefix '{}'", prefix.trim()),
                )
            })
    }
}

impl fmt::Display for VisaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Decision column of a visa record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisaDecision {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl VisaDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisaDecision::Pending => "pending",
            VisaDecision::Approved => "approved",
            VisaDecision::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "pending" => Ok(VisaDecision::Pending),
            "approved" => Ok(VisaDecision::Approved),
            "rejected" => Ok(VisaDecision::Rejected),
            other => Err(ValidationError::invalid_format(
                "visa_decision",
                format!("unknown decision '{}'", other),
            )),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, VisaDecision::Pending)
    }
}

impl fmt::Display for VisaDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
