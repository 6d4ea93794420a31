use axum::Router;
use sqlx::SqlitePool;

/// Human-readable application name, used in logs and startup output.
pub const APP_NAME: &str = "Clearpath";

/// Shared state available to all handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: config::Config,
}

impl AppState {
    /// Directory view over the app database for identity/tenancy resolution.
    pub fn directory(&self) -> auth::SqliteDirectory<'_> {
        auth::SqliteDirectory::new(&self.db)
    }

    /// Factory for token-bound data-access handles.
    pub fn scoped_clients(&self) -> auth::SqliteScopedClientFactory {
        auth::SqliteScopedClientFactory::new(self.db.clone())
    }
}

/// App routes, merged with nothing else; this service is API-only.
pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new()
        .merge(features::me::routes())
        .merge(features::orgs::routes())
        .merge(features::members::routes())
}

pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
