use sqlx::{FromRow, SqliteExecutor};

use crate::app::domain::{MembershipRole, MembershipStatus, OrganizationId, UserId};

/// Database row for memberships table.
#[derive(Debug, FromRow)]
pub struct MembershipRow {
    pub organization_id: String,
    pub user_id: String,
    pub role: String,
    pub status: String,
    pub created_at: i64,
}

/// Data structure for inserting a new membership.
pub struct NewMembership {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub created_at: i64,
}

/// Insert a new membership. Fails on a duplicate (organization, user) pair.
pub async fn insert<'e, E>(executor: E, membership: &NewMembership) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO memberships (organization_id, user_id, role, status, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(membership.organization_id.as_str())
    .bind(membership.user_id.as_str())
    .bind(membership.role.to_string())
    .bind(membership.status.to_string())
    .bind(membership.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// List a user's active memberships, oldest first. The ordering is load-bearing:
/// the oldest row is the deterministic default when resolution is ambiguous.
pub async fn list_active_for_user<'e, E>(
    executor: E,
    user_id: &UserId,
) -> Result<Vec<MembershipRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, MembershipRow>(
        "SELECT organization_id, user_id, role, status, created_at FROM memberships WHERE user_id = ? AND status = 'active' ORDER BY created_at ASC",
    )
    .bind(user_id.as_str())
    .fetch_all(executor)
    .await
}

/// List a user's pending memberships, oldest first, up to `limit` rows.
/// Resolution only needs existence, so callers usually pass 1.
pub async fn list_pending_for_user<'e, E>(
    executor: E,
    user_id: &UserId,
    limit: i64,
) -> Result<Vec<MembershipRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, MembershipRow>(
        "SELECT organization_id, user_id, role, status, created_at FROM memberships WHERE user_id = ? AND status = 'pending' ORDER BY created_at ASC LIMIT ?",
    )
    .bind(user_id.as_str())
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Find the membership row for a (user, organization) pair, any status.
pub async fn find<'e, E>(
    executor: E,
    user_id: &UserId,
    organization_id: &OrganizationId,
) -> Result<Option<MembershipRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, MembershipRow>(
        "SELECT organization_id, user_id, role, status, created_at FROM memberships WHERE user_id = ? AND organization_id = ?",
    )
    .bind(user_id.as_str())
    .bind(organization_id.as_str())
    .fetch_optional(executor)
    .await
}

/// List every membership in an organization, oldest first. For the admin view.
pub async fn list_for_org<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<MembershipRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, MembershipRow>(
        "SELECT organization_id, user_id, role, status, created_at FROM memberships WHERE organization_id = ? ORDER BY created_at ASC",
    )
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Move a pending membership to `status`. Returns false when no pending row
/// matched, so approve/reject of an already-settled row is a no-op the
/// handler can report.
pub async fn settle_pending<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    user_id: &UserId,
    status: MembershipStatus,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE memberships SET status = ? WHERE organization_id = ? AND user_id = ? AND status = 'pending'",
    )
    .bind(status.to_string())
    .bind(organization_id.as_str())
    .bind(user_id.as_str())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Change the role on an active membership. Returns false when no active row matched.
pub async fn update_role<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    user_id: &UserId,
    role: MembershipRole,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE memberships SET role = ? WHERE organization_id = ? AND user_id = ? AND status = 'active'",
    )
    .bind(role.to_string())
    .bind(organization_id.as_str())
    .bind(user_id.as_str())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
