use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::lock_poisoned;
use crate::domain::foundation::{DomainError, MarcheId, Role, UserId};
use crate::ports::RoleDirectory;

/// In-memory role assignments per marché.
#[derive(Debug, Default)]
pub struct InMemoryRoleDirectory {
    roles: RwLock<HashMap<(UserId, MarcheId), Role>>,
}

impl InMemoryRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign (or replace) a user's role on a marché.
    pub fn assign(&self, user_id: UserId, marche_id: MarcheId, role: Role) -> Result<(), DomainError> {
        self.roles
            .write()
            .map_err(|_| lock_poisoned())?
            .insert((user_id, marche_id), role);
        Ok(())
    }

    /// Builder-style assignment for test setup.
    pub fn with_role(self, user_id: UserId, marche_id: MarcheId, role: Role) -> Self {
        if let Ok(mut roles) = self.roles.write() {
            roles.insert((user_id, marche_id), role);
        }
        self
    }
}

#[async_trait]
impl RoleDirectory for InMemoryRoleDirectory {
    async fn role_of(
        &self,
        user_id: &UserId,
        marche_id: &MarcheId,
    ) -> Result<Option<Role>, DomainError> {
        let roles = self.roles.read().map_err(|_| lock_poisoned())?;
        Ok(roles.get(&(user_id.clone(), *marche_id)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roles_are_scoped_to_marche() {
        let user = UserId::new("moe-1").unwrap();
        let marche = MarcheId::new();
        let directory = InMemoryRoleDirectory::new().with_role(user.clone(), marche, Role::Moe);

        assert_eq!(directory.role_of(&user, &marche).await.unwrap(), Some(Role::Moe));
        assert_eq!(directory.role_of(&user, &MarcheId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn assign_replaces_role() {
        let user = UserId::new("u").unwrap();
        let marche = MarcheId::new();
        let directory = InMemoryRoleDirectory::new();
        directory.assign(user.clone(), marche, Role::Consultant).unwrap();
        directory.assign(user.clone(), marche, Role::Mandataire).unwrap();
        assert_eq!(
            directory.role_of(&user, &marche).await.unwrap(),
            Some(Role::Mandataire)
        );
    }
}
