use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;
use validator::Validate;

use crate::app::{
    auth, db,
    domain::{MembershipRole, MembershipStatus, OrganizationId},
    error::AuthError,
    AppState,
};

/// Query carrying the optional explicit org selection.
#[derive(Debug, Deserialize)]
pub struct OrgQuery {
    pub org_id: Option<String>,
}

/// GET /api/org — Resolve the caller's current organization.
///
/// Read path: resolution is allowed to fall back to the caller's oldest
/// membership when they belong to several orgs and name none.
pub async fn current(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OrgQuery>,
) -> Result<Json<serde_json::Value>, AuthError> {
    let provided = auth::parse_org_param(query.org_id.as_ref())?;
    let directory = state.directory();
    let clients = state.scoped_clients();

    let ctx = auth::resolve_org_context(&directory, &clients, &headers, provided.as_ref(), true)
        .await?;

    let org = db::organizations::find_by_id(&state.db, &ctx.org_id)
        .await
        .map_err(AuthError::Store)?
        .ok_or(AuthError::NotFoundOrg)?;

    Ok(Json(json!({
        "organization": {
            "id": org.id,
            "name": org.name,
            "display_name": org.display_name,
        },
        "role": ctx.role.to_string(),
    })))
}

/// GET /api/orgs/admin — Organizations the caller administers. Pre-scopes
/// the admin UI; gates nothing by itself.
pub async fn admin_orgs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AuthError> {
    let directory = state.directory();
    let (user, _token) = auth::authenticate(&directory, &headers).await?;

    let orgs = auth::user_admin_orgs(&directory, &user).await?;
    let ids: Vec<String> = orgs.iter().map(|o| o.as_str()).collect();

    Ok(Json(json!({ "organization_ids": ids })))
}

/// Payload for POST /api/orgs.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrgBody {
    #[validate(length(min = 2, max = 80))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub display_name: String,
}

/// POST /api/orgs — Create an organization. The creator becomes its first
/// active admin, so the new tenant is immediately resolvable for them.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateOrgBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AuthError> {
    body.validate()
        .map_err(|_| AuthError::Validation("Organization name must be 2–80 characters".to_string()))?;

    let directory = state.directory();
    let (user, _token) = auth::authenticate(&directory, &headers).await?;

    let org_id = OrganizationId::new();
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let mut tx = state.db.begin().await.map_err(AuthError::Store)?;

    db::organizations::insert(
        &mut *tx,
        &db::NewOrganization {
            id: org_id.clone(),
            name: body.name,
            display_name: body.display_name,
        },
    )
    .await
    .map_err(AuthError::Store)?;

    db::memberships::insert(
        &mut *tx,
        &db::NewMembership {
            organization_id: org_id.clone(),
            user_id: user.id,
            role: MembershipRole::Admin,
            status: MembershipStatus::Active,
            created_at: now,
        },
    )
    .await
    .map_err(AuthError::Store)?;

    tx.commit().await.map_err(AuthError::Store)?;

    tracing::info!(org_id = %org_id.as_str(), "organization created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "organization_id": org_id.as_str() })),
    ))
}

/// Payload for POST /api/orgs/:org_id/join.
#[derive(Debug, Deserialize, Default)]
pub struct JoinBody {
    pub role: Option<MembershipRole>,
}

/// POST /api/orgs/:org_id/join — Request membership in an existing org.
/// Creates a pending row; an org admin approves or rejects it later. The
/// requester cannot activate themself.
pub async fn join(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(org_id): Path<String>,
    body: Option<Json<JoinBody>>,
) -> Result<(StatusCode, Json<serde_json::Value>), AuthError> {
    let org_id = OrganizationId::from_string(&org_id).map_err(|_| AuthError::NotFoundOrg)?;
    let directory = state.directory();
    let (user, _token) = auth::authenticate(&directory, &headers).await?;

    if !db::organizations::exists(&state.db, &org_id)
        .await
        .map_err(AuthError::Store)?
    {
        return Err(AuthError::NotFoundOrg);
    }

    // One row per (org, user), whatever its status. A rejected requester
    // stays rejected until an admin intervenes.
    if db::memberships::find(&state.db, &user.id, &org_id)
        .await
        .map_err(AuthError::Store)?
        .is_some()
    {
        return Err(AuthError::Validation(
            "A membership already exists for this organization".to_string(),
        ));
    }

    let role = body
        .map(|Json(b)| b.role.unwrap_or(MembershipRole::Referrer))
        .unwrap_or(MembershipRole::Referrer);
    let now = OffsetDateTime::now_utc().unix_timestamp();

    db::memberships::insert(
        &state.db,
        &db::NewMembership {
            organization_id: org_id.clone(),
            user_id: user.id.clone(),
            role,
            status: MembershipStatus::Pending,
            created_at: now,
        },
    )
    .await
    .map_err(AuthError::Store)?;

    tracing::info!(
        org_id = %org_id.as_str(),
        user_id = %user.id.as_str(),
        "membership requested"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "pending", "role": role.to_string() })),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/org", get(current))
        .route("/api/orgs", post(create))
        .route("/api/orgs/admin", get(admin_orgs))
        .route("/api/orgs/:org_id/join", post(join))
}
