use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use serde_json::json;

use crate::app::{auth, auth::SuperAdminRegistry, error::AuthError, AppState};

/// GET /api/me — Verified identity of the caller, no org resolution.
pub async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AuthError> {
    let directory = state.directory();
    let (user, _token) = auth::authenticate(&directory, &headers).await?;

    let super_admin = directory
        .is_super_admin(&user.id)
        .await
        .map_err(AuthError::Store)?;

    Ok(Json(json!({
        "user_id": user.id.as_str(),
        "email": user.email,
        "super_admin": super_admin,
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/me", get(show))
}
