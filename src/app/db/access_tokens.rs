use sqlx::SqliteExecutor;
use time::OffsetDateTime;

use crate::app::db::users::User;
use crate::app::domain::UserId;

/// Insert a new access token for a user. Returns the token value.
pub async fn create<'e, E>(
    executor: E,
    user_id: &UserId,
    expires_at: OffsetDateTime,
) -> Result<String, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let token = ulid::Ulid::new().to_string();
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query(
        "INSERT INTO access_tokens (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id.as_str())
    .bind(expires_at.unix_timestamp())
    .bind(now)
    .execute(executor)
    .await?;

    Ok(token)
}

/// Resolve a non-expired token to its user. Returns None for unknown or
/// expired tokens; the two are indistinguishable to the caller.
pub async fn find_user_for_token<'e, E>(
    executor: E,
    token: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query_as::<_, User>(
        "SELECT u.id, u.email, u.created_at FROM users u \
         JOIN access_tokens t ON t.user_id = u.id \
         WHERE t.token = ? AND t.expires_at > ?",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(executor)
    .await
}
