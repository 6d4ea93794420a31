#![allow(dead_code)]

use axum::body::Body;
use clearpath::app::domain::{MembershipRole, MembershipStatus, OrganizationId, UserId};
use clearpath::app::{config::Config, db, AppState};
use clearpath::create_router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

/// Single-connection in-memory pool so every query sees the migrated schema.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    let state = AppState {
        db: pool,
        config: Config::for_tests(),
    };
    create_router(state)
}

/// Create a user and a 30-day access token for them.
pub async fn user_with_token(pool: &SqlitePool, email: &str) -> (UserId, String) {
    let user_id = UserId::new();
    db::users::insert(
        pool,
        &db::NewUser {
            id: user_id.clone(),
            email: email.to_string(),
        },
    )
    .await
    .unwrap();

    let expires_at = OffsetDateTime::now_utc() + Duration::days(30);
    let token = db::access_tokens::create(pool, &user_id, expires_at)
        .await
        .unwrap();
    (user_id, token)
}

pub async fn create_org(pool: &SqlitePool, name: &str) -> OrganizationId {
    let org_id = OrganizationId::new();
    db::organizations::insert(
        pool,
        &db::NewOrganization {
            id: org_id.clone(),
            name: name.to_string(),
            display_name: name.to_string(),
        },
    )
    .await
    .unwrap();
    org_id
}

/// Insert a membership row with an explicit created_at, so tests can pin
/// the oldest-first ordering.
pub async fn add_membership(
    pool: &SqlitePool,
    org_id: &OrganizationId,
    user_id: &UserId,
    role: MembershipRole,
    status: MembershipStatus,
    created_at: i64,
) {
    db::memberships::insert(
        pool,
        &db::NewMembership {
            organization_id: org_id.clone(),
            user_id: user_id.clone(),
            role,
            status,
            created_at,
        },
    )
    .await
    .unwrap();
}

pub async fn make_super_admin(pool: &SqlitePool, user_id: &UserId) {
    db::super_admins::insert(pool, user_id).await.unwrap();
}

/// Send a request with an optional bearer token and JSON body; return
/// status and parsed body.
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (http::StatusCode, serde_json::Value) {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

pub async fn get(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
) -> (http::StatusCode, serde_json::Value) {
    send(app, "GET", uri, token, None).await
}

pub fn error_message(body: &serde_json::Value) -> String {
    body.get("error")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
