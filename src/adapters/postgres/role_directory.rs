//! PostgreSQL implementation of RoleDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use super::column;
use crate::domain::foundation::{DomainError, MarcheId, Role, UserId};
use crate::ports::RoleDirectory;

/// Reads role grants from the `marche_roles` table.
#[derive(Clone)]
pub struct PostgresRoleDirectory {
    pool: PgPool,
}

impl PostgresRoleDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grant (or replace) a user's role on a marché.
    pub async fn grant(
        &self,
        user_id: &UserId,
        marche_id: &MarcheId,
        role: Role,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO marche_roles (user_id, marche_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, marche_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(user_id.as_str())
        .bind(marche_id.as_uuid())
        .bind(role.as_label())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to grant role", e))?;
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for PostgresRoleDirectory {
    async fn role_of(
        &self,
        user_id: &UserId,
        marche_id: &MarcheId,
    ) -> Result<Option<Role>, DomainError> {
        let row = sqlx::query("SELECT role FROM marche_roles WHERE user_id = $1 AND marche_id = $2")
            .bind(user_id.as_str())
            .bind(marche_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch role", e))?;

        match row {
            Some(row) => {
                let role: String = column(&row, "role")?;
                Ok(Some(role.parse::<Role>()?))
            }
            None => Ok(None),
        }
    }
}
