use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::Error as SqlxError;

/// Authorization error taxonomy. Every protected handler returns exactly this
/// type; nothing else escapes the identity/tenancy layer.
///
/// Messages are user-displayable and never name identifiers the caller did
/// not already supply.
#[derive(Debug)]
pub enum AuthError {
    /// Missing or invalid credential (401).
    Unauthenticated,

    /// An org was named but the caller has no active membership in it (403).
    ForbiddenNoAccess,

    /// No active membership, but a pending one awaits approval (403).
    ForbiddenPending,

    /// Resolved role is below the required minimum (403).
    ForbiddenInsufficientRole,

    /// Org omitted while the caller holds this many active memberships (400).
    AmbiguousOrg(usize),

    /// A super admin must always name the org to act in (400).
    MissingOrgForSuperAdmin,

    /// A super admin named an org that does not exist (404).
    NotFoundOrg,

    /// The caller has no membership at all, active or pending (404).
    NotFoundNoMembership,

    /// Invalid request payload (400). Used by handlers, not by resolution.
    Validation(String),

    /// A handler-level lookup found nothing (404), e.g. no pending row to approve.
    NotFound(String),

    /// Store I/O failure (500). Deliberately outside the 4xx taxonomy so a
    /// transient database error is never mistaken for a denial.
    Store(SqlxError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AuthError::ForbiddenNoAccess => (
                StatusCode::FORBIDDEN,
                "You do not have access to this organization".to_string(),
            ),
            AuthError::ForbiddenPending => (
                StatusCode::FORBIDDEN,
                "Your membership is awaiting approval by an organization admin".to_string(),
            ),
            AuthError::ForbiddenInsufficientRole => (
                StatusCode::FORBIDDEN,
                "This action requires admin privileges".to_string(),
            ),
            AuthError::AmbiguousOrg(count) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "You belong to {} organizations. Specify an organization id to continue.",
                    count
                ),
            ),
            AuthError::MissingOrgForSuperAdmin => (
                StatusCode::BAD_REQUEST,
                "Super admins must specify an organization id".to_string(),
            ),
            AuthError::NotFoundOrg => {
                (StatusCode::NOT_FOUND, "Organization not found".to_string())
            }
            AuthError::NotFoundNoMembership => (
                StatusCode::NOT_FOUND,
                "You are not a member of any organization".to_string(),
            ),
            AuthError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AuthError::Store(err) => {
                tracing::error!(%err, "store error during authorization");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
