//! Integration tests for org creation, join requests, and membership
//! administration (approve / reject / role change).

use clearpath::app::domain::{MembershipRole, MembershipStatus, OrganizationId};
use serde_json::json;

mod common;

use crate::common::*;

#[tokio::test]
async fn create_org_makes_creator_an_active_admin() {
    let pool = test_pool().await;
    let (_user, token) = user_with_token(&pool, "founder@clinic.example").await;
    let app = test_router(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/orgs",
        Some(&token),
        Some(json!({ "name": "northside", "display_name": "Northside Clinic" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);
    let org_id = body["organization_id"].as_str().unwrap().to_string();

    // The new tenant resolves immediately for the creator, as admin.
    let (status, body) = get(&app, "/api/org", Some(&token)).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["organization"]["id"], org_id);
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn create_org_rejects_bad_name() {
    let pool = test_pool().await;
    let (_user, token) = user_with_token(&pool, "founder@clinic.example").await;
    let app = test_router(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/orgs",
        Some(&token),
        Some(json!({ "name": "x", "display_name": "X" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn join_creates_a_pending_membership() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (joiner, token) = user_with_token(&pool, "joiner@clinic.example").await;
    let app = test_router(pool.clone());

    let uri = format!("/api/orgs/{}/join", org.as_str());
    let (status, body) = send(&app, "POST", &uri, Some(&token), Some(json!({ "role": "staff" }))).await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["role"], "staff");

    let row = clearpath::app::db::memberships::find(&pool, &joiner, &org)
        .await
        .unwrap()
        .expect("membership row exists");
    assert_eq!(row.status, "pending");

    // Pending members cannot resolve the org yet.
    let (status, _) = get(&app, "/api/org", Some(&token)).await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn join_nonexistent_org_is_not_found() {
    let pool = test_pool().await;
    let (_joiner, token) = user_with_token(&pool, "joiner@clinic.example").await;
    let app = test_router(pool);

    let uri = format!("/api/orgs/{}/join", OrganizationId::new().as_str());
    let (status, _) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_join_is_rejected() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (joiner, token) = user_with_token(&pool, "joiner@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &joiner,
        MembershipRole::Referrer,
        MembershipStatus::Rejected,
        100,
    )
    .await;
    let app = test_router(pool);

    // A rejected row still blocks re-joining; an admin has to intervene.
    let uri = format!("/api/orgs/{}/join", org.as_str());
    let (status, _) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_activates_membership_and_unlocks_resolution() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (admin, admin_token) = user_with_token(&pool, "admin@clinic.example").await;
    let (joiner, joiner_token) = user_with_token(&pool, "joiner@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &admin,
        MembershipRole::Admin,
        MembershipStatus::Active,
        100,
    )
    .await;
    add_membership(
        &pool,
        &org,
        &joiner,
        MembershipRole::Staff,
        MembershipStatus::Pending,
        200,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/approve", joiner.as_str());
    let (status, body) = send(&app, "POST", &uri, Some(&admin_token), None).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["status"], "active");

    let (status, body) = get(&app, "/api/org", Some(&joiner_token)).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["role"], "staff");
}

#[tokio::test]
async fn reject_settles_the_request_without_access() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (admin, admin_token) = user_with_token(&pool, "admin@clinic.example").await;
    let (joiner, joiner_token) = user_with_token(&pool, "joiner@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &admin,
        MembershipRole::Admin,
        MembershipStatus::Active,
        100,
    )
    .await;
    add_membership(
        &pool,
        &org,
        &joiner,
        MembershipRole::Referrer,
        MembershipStatus::Pending,
        200,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/reject", joiner.as_str());
    let (status, _) = send(&app, "POST", &uri, Some(&admin_token), None).await;
    assert_eq!(status, http::StatusCode::OK);

    // No active and no pending row left: resolution reports no membership.
    let (status, _) = get(&app, "/api/org", Some(&joiner_token)).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn approving_a_settled_membership_is_not_found() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (admin, admin_token) = user_with_token(&pool, "admin@clinic.example").await;
    let (member, _) = user_with_token(&pool, "member@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &admin,
        MembershipRole::Admin,
        MembershipStatus::Active,
        100,
    )
    .await;
    add_membership(
        &pool,
        &org,
        &member,
        MembershipRole::Staff,
        MembershipStatus::Active,
        200,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/approve", member.as_str());
    let (status, _) = send(&app, "POST", &uri, Some(&admin_token), None).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admins_cannot_settle_their_own_membership() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (admin, admin_token) = user_with_token(&pool, "admin@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &admin,
        MembershipRole::Admin,
        MembershipStatus::Active,
        100,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/approve", admin.as_str());
    let (status, _) = send(&app, "POST", &uri, Some(&admin_token), None).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_cannot_approve_members() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (staff, staff_token) = user_with_token(&pool, "staff@clinic.example").await;
    let (joiner, _) = user_with_token(&pool, "joiner@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &staff,
        MembershipRole::Staff,
        MembershipStatus::Active,
        100,
    )
    .await;
    add_membership(
        &pool,
        &org,
        &joiner,
        MembershipRole::Referrer,
        MembershipStatus::Pending,
        200,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/approve", joiner.as_str());
    let (status, _) = send(&app, "POST", &uri, Some(&staff_token), None).await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_can_approve_with_explicit_org() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (platform, token) = user_with_token(&pool, "platform@clearpath.example").await;
    let (joiner, joiner_token) = user_with_token(&pool, "joiner@clinic.example").await;
    make_super_admin(&pool, &platform).await;
    add_membership(
        &pool,
        &org,
        &joiner,
        MembershipRole::Staff,
        MembershipStatus::Pending,
        100,
    )
    .await;
    let app = test_router(pool);

    let uri = format!(
        "/api/org/members/{}/approve?org_id={}",
        joiner.as_str(),
        org.as_str()
    );
    let (status, _) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, _) = get(&app, "/api/org", Some(&joiner_token)).await;
    assert_eq!(status, http::StatusCode::OK);
}

#[tokio::test]
async fn role_change_updates_an_active_member() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (admin, admin_token) = user_with_token(&pool, "admin@clinic.example").await;
    let (member, member_token) = user_with_token(&pool, "member@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &admin,
        MembershipRole::Admin,
        MembershipStatus::Active,
        100,
    )
    .await;
    add_membership(
        &pool,
        &org,
        &member,
        MembershipRole::Referrer,
        MembershipStatus::Active,
        200,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/role", member.as_str());
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "role": "staff" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["role"], "staff");

    let (_, body) = get(&app, "/api/org", Some(&member_token)).await;
    assert_eq!(body["role"], "staff");
}

#[tokio::test]
async fn admins_cannot_change_their_own_role() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (admin, admin_token) = user_with_token(&pool, "admin@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &admin,
        MembershipRole::Admin,
        MembershipStatus::Active,
        100,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/role", admin.as_str());
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "role": "staff" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_change_needs_an_active_row() {
    let pool = test_pool().await;
    let org = create_org(&pool, "clinic").await;
    let (admin, admin_token) = user_with_token(&pool, "admin@clinic.example").await;
    let (pending, _) = user_with_token(&pool, "pending@clinic.example").await;
    add_membership(
        &pool,
        &org,
        &admin,
        MembershipRole::Admin,
        MembershipStatus::Active,
        100,
    )
    .await;
    add_membership(
        &pool,
        &org,
        &pending,
        MembershipRole::Staff,
        MembershipStatus::Pending,
        200,
    )
    .await;
    let app = test_router(pool);

    let uri = format!("/api/org/members/{}/role", pending.as_str());
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}
