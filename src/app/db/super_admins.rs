use sqlx::SqliteExecutor;
use time::OffsetDateTime;

use crate::app::domain::UserId;

/// Grant platform-wide super-admin rights to a user. Provisioned out-of-band;
/// there is no HTTP surface for this.
pub async fn insert<'e, E>(executor: E, user_id: &UserId) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("INSERT INTO super_admins (user_id, created_at) VALUES (?, ?)")
        .bind(user_id.as_str())
        .bind(now)
        .execute(executor)
        .await?;
    Ok(())
}

/// Check if a user holds a super-admin grant.
pub async fn is_super_admin<'e, E>(executor: E, user_id: &UserId) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM super_admins WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_one(executor)
        .await?;

    Ok(count > 0)
}
