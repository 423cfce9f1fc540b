//! Role checks shared by every handler.

use crate::domain::foundation::{Capability, MarcheId, Role, UserId};
use crate::domain::workflow::WorkflowError;
use crate::ports::RoleDirectory;

/// Resolve the user's role on the marché and check it grants `capability`.
///
/// # Errors
///
/// - `NotAMember` if the user has no role on the marché
/// - `Forbidden` if the role does not grant the capability
pub(crate) async fn authorize(
    roles: &dyn RoleDirectory,
    user_id: &UserId,
    marche_id: &MarcheId,
    capability: Capability,
) -> Result<Role, WorkflowError> {
    let role = roles
        .role_of(user_id, marche_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user = %user_id, marche = %marche_id, "user has no role on marché");
            WorkflowError::NotAMember
        })?;

    if !role.allows(capability) {
        tracing::warn!(
            user = %user_id,
            marche = %marche_id,
            role = %role,
            capability = capability.as_str(),
            "capability denied"
        );
        return Err(WorkflowError::Forbidden { capability });
    }
    Ok(role)
}
