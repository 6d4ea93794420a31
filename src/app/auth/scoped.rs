//! Token-bound data-access handles.
//!
//! Row-level security for domain tables (patients, orders, PA requests) is
//! enforced by the downstream store against the carried token. This layer
//! decides the org and role, then hands domain code a handle already
//! authenticated as the caller; it never re-checks row access itself.

use sqlx::SqlitePool;

/// Data-access handle pre-authenticated as one caller.
#[derive(Clone)]
pub struct ScopedClient {
    pool: SqlitePool,
    token: String,
}

impl ScopedClient {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The caller's token, forwarded to the downstream store on every query.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Issues scoped clients. A trait so tests and other deployments can swap
/// the backing store.
pub trait ScopedClientFactory: Send + Sync {
    fn create(&self, token: &str) -> ScopedClient;
}

/// Factory over the app's SQLite pool.
#[derive(Clone)]
pub struct SqliteScopedClientFactory {
    pool: SqlitePool,
}

impl SqliteScopedClientFactory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScopedClientFactory for SqliteScopedClientFactory {
    fn create(&self, token: &str) -> ScopedClient {
        ScopedClient {
            pool: self.pool.clone(),
            token: token.to_string(),
        }
    }
}
