//! Role directory port - who does what on a marché.
//!
//! The workflow never decides membership itself. It asks this port for the
//! caller's role on the marché and checks the capability against it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MarcheId, Role, UserId};

/// Port for resolving a user's role on a marché.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Returns the user's role, or `None` if they are not a member.
    async fn role_of(&self, user_id: &UserId, marche_id: &MarcheId)
        -> Result<Option<Role>, DomainError>;
}
