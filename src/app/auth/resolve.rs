//! Organization and role resolution.
//!
//! Decides *which* organization a request acts in and *with what* role,
//! before any domain action proceeds. Stateless: every call re-reads the
//! backing stores, so a revoked membership takes effect immediately.

use crate::app::auth::directory::{
    Identity, MembershipStore, OrganizationStore, SuperAdminRegistry,
};
use crate::app::domain::{MembershipRole, MembershipStatus, OrganizationId, Role};
use crate::app::error::AuthError;

/// Select the target organization for `user`.
///
/// Super admins bypass membership entirely but must always name the org
/// (`MissingOrgForSuperAdmin` otherwise, regardless of `allow_ambiguous`).
/// Ordinary users resolve against their active memberships:
/// an explicitly named org must be in the active set; an omitted org
/// auto-selects the single membership, or with `allow_ambiguous` the oldest
/// one. `allow_ambiguous` is meant for idempotent read paths only.
pub async fn resolve_org<D>(
    directory: &D,
    user: &Identity,
    provided: Option<&OrganizationId>,
    allow_ambiguous: bool,
) -> Result<OrganizationId, AuthError>
where
    D: MembershipStore + OrganizationStore + SuperAdminRegistry + ?Sized,
{
    if directory
        .is_super_admin(&user.id)
        .await
        .map_err(AuthError::Store)?
    {
        let org_id = provided.ok_or(AuthError::MissingOrgForSuperAdmin)?;
        if !directory.exists(org_id).await.map_err(AuthError::Store)? {
            return Err(AuthError::NotFoundOrg);
        }
        return Ok(org_id.clone());
    }

    // Oldest first, so index 0 is the user's canonical org.
    let active = directory
        .list_active(&user.id)
        .await
        .map_err(AuthError::Store)?;

    if let Some(org_id) = provided {
        if active.iter().any(|m| &m.organization_id == org_id) {
            return Ok(org_id.clone());
        }
        return Err(AuthError::ForbiddenNoAccess);
    }

    match active.len() {
        1 => Ok(active[0].organization_id.clone()),
        0 => {
            let pending = directory
                .list_pending(&user.id, 1)
                .await
                .map_err(AuthError::Store)?;
            if pending.is_empty() {
                Err(AuthError::NotFoundNoMembership)
            } else {
                Err(AuthError::ForbiddenPending)
            }
        }
        count => {
            if allow_ambiguous {
                Ok(active[0].organization_id.clone())
            } else {
                Err(AuthError::AmbiguousOrg(count))
            }
        }
    }
}

/// Resolve the caller's role within `org_id`.
///
/// Super admins resolve to `Role::SuperAdmin` even without a membership row.
/// Everyone else needs an *active* membership in that org.
pub async fn resolve_role<D>(
    directory: &D,
    user: &Identity,
    org_id: &OrganizationId,
) -> Result<Role, AuthError>
where
    D: MembershipStore + SuperAdminRegistry + ?Sized,
{
    if directory
        .is_super_admin(&user.id)
        .await
        .map_err(AuthError::Store)?
    {
        return Ok(Role::SuperAdmin);
    }

    let membership = directory
        .get(&user.id, org_id)
        .await
        .map_err(AuthError::Store)?;

    match membership {
        Some(m) if m.status == MembershipStatus::Active => Ok(m.role.into()),
        _ => Err(AuthError::ForbiddenNoAccess),
    }
}

/// Organizations the user administers. Super admins administer every org;
/// everyone else, the orgs of their active admin memberships. Pure read,
/// used to pre-scope admin UI; gates nothing by itself.
pub async fn user_admin_orgs<D>(
    directory: &D,
    user: &Identity,
) -> Result<Vec<OrganizationId>, AuthError>
where
    D: MembershipStore + SuperAdminRegistry + ?Sized,
{
    if directory
        .is_super_admin(&user.id)
        .await
        .map_err(AuthError::Store)?
    {
        return directory.list_all_org_ids().await.map_err(AuthError::Store);
    }

    let active = directory
        .list_active(&user.id)
        .await
        .map_err(AuthError::Store)?;

    Ok(active
        .into_iter()
        .filter(|m| m.role == MembershipRole::Admin)
        .map(|m| m.organization_id)
        .collect())
}
