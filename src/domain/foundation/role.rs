//! Roles a user can hold on a marché, and what each role may do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Role granted to a user on one marché (a "droit").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Contractor: creates, uploads and diffuses documents.
    Mandataire,
    /// Maître d'œuvre: issues visas.
    Moe,
    /// Read-only participant.
    Consultant,
}

/// Action a handler needs permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Read,
    Submit,
    IssueVisa,
}

impl Capability {
    /// Returns a short label for logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Read => "read",
            Capability::Submit => "submit",
            Capability::IssueVisa => "issue_visa",
        }
    }
}

impl Role {
    /// Returns true if this role may perform the capability.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Read => true,
            Capability::Submit => self.can_diffuse(),
            Capability::IssueVisa => self.can_issue_visa(),
        }
    }

    /// Mandataires create, upload and diffuse documents.
    pub fn can_diffuse(&self) -> bool {
        matches!(self, Role::Mandataire)
    }

    /// Only the MOE approves or rejects.
    pub fn can_issue_visa(&self) -> bool {
        matches!(self, Role::Moe)
    }

    /// Label stored in the `marche_roles` table.
    pub fn as_label(&self) -> &'static str {
        match self {
            Role::Mandataire => "Mandataire",
            Role::Moe => "MOE",
            Role::Consultant => "Consultant",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Mandataire" | "mandataire" => Ok(Role::Mandataire),
            "MOE" | "Moe" | "moe" => Ok(Role::Moe),
            "Consultant" | "consultant" => Ok(Role::Consultant),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}
