//! Identity & tenancy resolution.
//!
//! Every protected handler starts here: extract the credential, verify the
//! identity, resolve the target organization, resolve the caller's role,
//! then (for admin surfaces) enforce the minimum role. Each step either
//! yields or fails with one `AuthError`; a partially built context is never
//! returned. Nothing is cached and nothing is retried, so a revoked
//! membership or token takes effect on the next request.

pub mod directory;
pub mod resolve;
pub mod scoped;
pub mod token;

pub use directory::{
    Identity, IdentityVerifier, Membership, MembershipStore, OrganizationStore, SqliteDirectory,
    SuperAdminRegistry,
};
pub use resolve::{resolve_org, resolve_role, user_admin_orgs};
pub use scoped::{ScopedClient, ScopedClientFactory, SqliteScopedClientFactory};

use axum::http::HeaderMap;

use crate::app::domain::{OrganizationId, Role};
use crate::app::error::AuthError;

/// Everything a request needs after the gate: who, where, as what, and a
/// store handle bound to their token. Built all-or-nothing, owned by the one
/// request that built it, dropped when the request ends.
pub struct AuthContext {
    pub user: Identity,
    pub token: String,
    pub org_id: OrganizationId,
    pub role: Role,
    pub client: ScopedClient,
}

/// Verify the request's credential. Missing token and failed verification
/// both surface as `Unauthenticated`; the caller learns nothing more.
pub async fn authenticate<D>(
    directory: &D,
    headers: &HeaderMap,
) -> Result<(Identity, String), AuthError>
where
    D: IdentityVerifier + ?Sized,
{
    let token = token::extract_token(headers).ok_or(AuthError::Unauthenticated)?;
    let user = directory
        .verify(&token)
        .await
        .map_err(AuthError::Store)?
        .ok_or(AuthError::Unauthenticated)?;
    Ok((user, token))
}

/// Full resolution pipeline: authenticate, pick the org, pick the role,
/// issue the scoped client. `allow_ambiguous` belongs to read paths only;
/// mutating surfaces go through [`require_org_admin`] which never sets it.
pub async fn resolve_org_context<D, F>(
    directory: &D,
    clients: &F,
    headers: &HeaderMap,
    provided: Option<&OrganizationId>,
    allow_ambiguous: bool,
) -> Result<AuthContext, AuthError>
where
    D: IdentityVerifier + MembershipStore + OrganizationStore + SuperAdminRegistry + ?Sized,
    F: ScopedClientFactory + ?Sized,
{
    let (user, token) = authenticate(directory, headers).await?;
    let org_id = resolve_org(directory, &user, provided, allow_ambiguous).await?;
    let role = resolve_role(directory, &user, &org_id).await?;
    let client = clients.create(&token);

    Ok(AuthContext {
        user,
        token,
        org_id,
        role,
        client,
    })
}

/// Resolution plus the org-admin policy check: the resolved role must be
/// admin or super admin, else `ForbiddenInsufficientRole`.
pub async fn require_org_admin<D, F>(
    directory: &D,
    clients: &F,
    headers: &HeaderMap,
    provided: Option<&OrganizationId>,
) -> Result<AuthContext, AuthError>
where
    D: IdentityVerifier + MembershipStore + OrganizationStore + SuperAdminRegistry + ?Sized,
    F: ScopedClientFactory + ?Sized,
{
    let ctx = resolve_org_context(directory, clients, headers, provided, false).await?;
    if !ctx.role.is_org_admin() {
        return Err(AuthError::ForbiddenInsufficientRole);
    }
    Ok(ctx)
}

/// Parse an optional `org_id` request parameter. A malformed id maps to
/// `NotFoundOrg` rather than a parse error, to avoid leaking id shape.
pub fn parse_org_param(org_id: Option<&String>) -> Result<Option<OrganizationId>, AuthError> {
    match org_id {
        None => Ok(None),
        Some(s) => OrganizationId::from_string(s)
            .map(Some)
            .map_err(|_| AuthError::NotFoundOrg),
    }
}
