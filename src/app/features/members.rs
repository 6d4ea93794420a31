//! Org membership administration. Every handler here sits behind the
//! org-admin gate; approval state only ever moves by admin action.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::{
    auth, db,
    domain::{MembershipRole, MembershipStatus, UserId},
    error::AuthError,
    AppState,
};
use crate::app::features::orgs::OrgQuery;

fn parse_member_id(user_id: &str) -> Result<UserId, AuthError> {
    UserId::from_string(user_id).map_err(|_| AuthError::NotFound("Member not found".to_string()))
}

/// GET /api/org/members — All membership rows in the org, any status.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OrgQuery>,
) -> Result<Json<serde_json::Value>, AuthError> {
    let provided = auth::parse_org_param(query.org_id.as_ref())?;
    let directory = state.directory();
    let clients = state.scoped_clients();

    let ctx = auth::require_org_admin(&directory, &clients, &headers, provided.as_ref()).await?;

    let rows = db::memberships::list_for_org(&state.db, &ctx.org_id)
        .await
        .map_err(AuthError::Store)?;

    let members: Vec<serde_json::Value> = rows
        .iter()
        .map(|m| {
            json!({
                "user_id": m.user_id,
                "role": m.role,
                "status": m.status,
                "created_at": m.created_at,
            })
        })
        .collect();

    Ok(Json(json!({ "members": members })))
}

/// POST /api/org/members/:user_id/approve — Pending membership becomes active.
pub async fn approve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(query): Query<OrgQuery>,
) -> Result<Json<serde_json::Value>, AuthError> {
    settle(&state, &headers, &user_id, &query, MembershipStatus::Active).await?;
    Ok(Json(json!({ "status": "active" })))
}

/// POST /api/org/members/:user_id/reject — Pending membership becomes rejected.
pub async fn reject(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(query): Query<OrgQuery>,
) -> Result<Json<serde_json::Value>, AuthError> {
    settle(&state, &headers, &user_id, &query, MembershipStatus::Rejected).await?;
    Ok(Json(json!({ "status": "rejected" })))
}

async fn settle(
    state: &AppState,
    headers: &HeaderMap,
    user_id: &str,
    query: &OrgQuery,
    status: MembershipStatus,
) -> Result<(), AuthError> {
    let provided = auth::parse_org_param(query.org_id.as_ref())?;
    let directory = state.directory();
    let clients = state.scoped_clients();

    let ctx = auth::require_org_admin(&directory, &clients, headers, provided.as_ref()).await?;
    let target = parse_member_id(user_id)?;

    // Membership rows are never settled by the user they belong to.
    if target == ctx.user.id {
        return Err(AuthError::Validation(
            "You cannot act on your own membership".to_string(),
        ));
    }

    let settled = db::memberships::settle_pending(&state.db, &ctx.org_id, &target, status)
        .await
        .map_err(AuthError::Store)?;

    if !settled {
        return Err(AuthError::NotFound(
            "No pending membership for that user".to_string(),
        ));
    }

    tracing::info!(
        org_id = %ctx.org_id.as_str(),
        target = %target.as_str(),
        status = %status,
        "membership settled"
    );

    Ok(())
}

/// Payload for PUT /api/org/members/:user_id/role.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleBody {
    pub role: MembershipRole,
}

/// PUT /api/org/members/:user_id/role — Change an active member's role.
/// Admins cannot change their own row; another admin has to do it.
pub async fn change_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(query): Query<OrgQuery>,
    Json(body): Json<ChangeRoleBody>,
) -> Result<Json<serde_json::Value>, AuthError> {
    let provided = auth::parse_org_param(query.org_id.as_ref())?;
    let directory = state.directory();
    let clients = state.scoped_clients();

    let ctx = auth::require_org_admin(&directory, &clients, &headers, provided.as_ref()).await?;
    let target = parse_member_id(&user_id)?;

    if target == ctx.user.id {
        return Err(AuthError::Validation(
            "You cannot change your own role".to_string(),
        ));
    }

    let updated = db::memberships::update_role(&state.db, &ctx.org_id, &target, body.role)
        .await
        .map_err(AuthError::Store)?;

    if !updated {
        return Err(AuthError::NotFound(
            "No active membership for that user".to_string(),
        ));
    }

    Ok(Json(json!({ "role": body.role.to_string() })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/org/members", get(list))
        .route("/api/org/members/:user_id/approve", post(approve))
        .route("/api/org/members/:user_id/reject", post(reject))
        .route("/api/org/members/:user_id/role", put(change_role))
}
