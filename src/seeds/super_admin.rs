use std::env;

use async_trait::async_trait;
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};

use crate::app::db;
use crate::app::domain::UserId;
use crate::seeds::{Seed, SeedOutcome};

/// Provisions the platform super admin named by SEED_SUPER_ADMIN_EMAIL.
/// Super-admin grants have no HTTP surface; this is the out-of-band path.
pub struct SuperAdminGrant;

#[async_trait]
impl Seed for SuperAdminGrant {
    fn version(&self) -> i64 {
        20260301090000
    }

    fn description(&self) -> &str {
        "super_admin_grant"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error> {
        let email = match env::var("SEED_SUPER_ADMIN_EMAIL") {
            Ok(e) if !e.is_empty() => e,
            _ => return Ok(SeedOutcome::Skipped),
        };

        let user_id = UserId::new();
        let mut tx = pool.begin().await?;

        db::users::insert(
            &mut *tx,
            &db::NewUser {
                id: user_id.clone(),
                email: email.clone(),
            },
        )
        .await?;
        db::super_admins::insert(&mut *tx, &user_id).await?;

        let expires_at = OffsetDateTime::now_utc() + Duration::days(30);
        let token = db::access_tokens::create(&mut *tx, &user_id, expires_at).await?;

        tx.commit().await?;

        eprintln!("Super admin {} provisioned; token (30 days): {}", email, token);
        Ok(SeedOutcome::Applied)
    }
}
