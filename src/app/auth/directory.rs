//! Consumed collaborator surface for identity and tenancy resolution.
//!
//! Each external dependency of the resolution engine is an explicit trait so
//! it can be faked in tests and replaced per deployment. `SqliteDirectory`
//! is the production implementation over the app's pool.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::app::db;
use crate::app::domain::{MembershipRole, MembershipStatus, OrganizationId, UserId};

/// Verified identity for one request. Immutable once issued by the verifier.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

/// A membership as the resolution engine sees it: parsed, domain-typed.
#[derive(Debug, Clone)]
pub struct Membership {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub created_at: i64,
}

/// Exchanges a bearer token for a verified identity. No caching: a revoked
/// token stops working on the very next request.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, sqlx::Error>;
}

/// Read access to membership rows.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Active memberships for a user, ordered by `created_at` ascending.
    /// The oldest row is the user's canonical org when resolution must pick one.
    async fn list_active(&self, user_id: &UserId) -> Result<Vec<Membership>, sqlx::Error>;

    /// Pending memberships for a user, up to `limit` rows.
    async fn list_pending(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<Membership>, sqlx::Error>;

    /// The membership row for a (user, organization) pair, any status.
    async fn get(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Option<Membership>, sqlx::Error>;
}

/// Organization existence checks.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn exists(&self, organization_id: &OrganizationId) -> Result<bool, sqlx::Error>;
}

/// Platform-wide admin registry, independent of any membership row.
#[async_trait]
pub trait SuperAdminRegistry: Send + Sync {
    async fn is_super_admin(&self, user_id: &UserId) -> Result<bool, sqlx::Error>;

    /// Every organization id, for platform-wide views.
    async fn list_all_org_ids(&self) -> Result<Vec<OrganizationId>, sqlx::Error>;
}

/// Production directory backed by the app's SQLite pool.
#[derive(Clone, Copy)]
pub struct SqliteDirectory<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SqliteDirectory<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

/// Rows with an unparseable id, role, or status are dropped rather than
/// surfaced; a row this layer cannot interpret must never grant access.
fn membership_from_row(row: db::MembershipRow) -> Option<Membership> {
    Some(Membership {
        organization_id: OrganizationId::from_string(&row.organization_id).ok()?,
        user_id: UserId::from_string(&row.user_id).ok()?,
        role: row.role.parse::<MembershipRole>().ok()?,
        status: row.status.parse::<MembershipStatus>().ok()?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl IdentityVerifier for SqliteDirectory<'_> {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, sqlx::Error> {
        let user = db::access_tokens::find_user_for_token(self.pool, token).await?;
        Ok(user.and_then(|u| {
            Some(Identity {
                id: UserId::from_string(&u.id).ok()?,
                email: u.email,
            })
        }))
    }
}

#[async_trait]
impl MembershipStore for SqliteDirectory<'_> {
    async fn list_active(&self, user_id: &UserId) -> Result<Vec<Membership>, sqlx::Error> {
        let rows = db::memberships::list_active_for_user(self.pool, user_id).await?;
        Ok(rows.into_iter().filter_map(membership_from_row).collect())
    }

    async fn list_pending(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<Membership>, sqlx::Error> {
        let rows = db::memberships::list_pending_for_user(self.pool, user_id, limit).await?;
        Ok(rows.into_iter().filter_map(membership_from_row).collect())
    }

    async fn get(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Option<Membership>, sqlx::Error> {
        let row = db::memberships::find(self.pool, user_id, organization_id).await?;
        Ok(row.and_then(membership_from_row))
    }
}

#[async_trait]
impl OrganizationStore for SqliteDirectory<'_> {
    async fn exists(&self, organization_id: &OrganizationId) -> Result<bool, sqlx::Error> {
        db::organizations::exists(self.pool, organization_id).await
    }
}

#[async_trait]
impl SuperAdminRegistry for SqliteDirectory<'_> {
    async fn is_super_admin(&self, user_id: &UserId) -> Result<bool, sqlx::Error> {
        db::super_admins::is_super_admin(self.pool, user_id).await
    }

    async fn list_all_org_ids(&self) -> Result<Vec<OrganizationId>, sqlx::Error> {
        let ids = db::organizations::list_all_ids(self.pool).await?;
        Ok(ids
            .into_iter()
            .filter_map(|id| OrganizationId::from_string(&id).ok())
            .collect())
    }
}
