use std::env;

use async_trait::async_trait;
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};

use crate::app::db;
use crate::app::domain::{MembershipRole, MembershipStatus, OrganizationId, UserId};
use crate::seeds::{Seed, SeedOutcome};

/// Creates a demo organization with an active admin named by SEED_ADMIN_EMAIL,
/// for local development against a fresh database.
pub struct DevTenant;

#[async_trait]
impl Seed for DevTenant {
    fn version(&self) -> i64 {
        20260301100000
    }

    fn description(&self) -> &str {
        "dev_tenant"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error> {
        let email = match env::var("SEED_ADMIN_EMAIL") {
            Ok(e) if !e.is_empty() => e,
            _ => return Ok(SeedOutcome::Skipped),
        };

        let user_id = UserId::new();
        let org_id = OrganizationId::new();
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut tx = pool.begin().await?;

        db::users::insert(
            &mut *tx,
            &db::NewUser {
                id: user_id.clone(),
                email: email.clone(),
            },
        )
        .await?;

        db::organizations::insert(
            &mut *tx,
            &db::NewOrganization {
                id: org_id.clone(),
                name: "demo-clinic".to_string(),
                display_name: "Demo Clinic".to_string(),
            },
        )
        .await?;

        db::memberships::insert(
            &mut *tx,
            &db::NewMembership {
                organization_id: org_id.clone(),
                user_id: user_id.clone(),
                role: MembershipRole::Admin,
                status: MembershipStatus::Active,
                created_at: now,
            },
        )
        .await?;

        let expires_at = OffsetDateTime::now_utc() + Duration::days(30);
        let token = db::access_tokens::create(&mut *tx, &user_id, expires_at).await?;

        tx.commit().await?;

        eprintln!(
            "Demo org {} created; admin {} token (30 days): {}",
            org_id.as_str(),
            email,
            token
        );
        Ok(SeedOutcome::Applied)
    }
}
