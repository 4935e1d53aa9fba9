//! Application state shared across admin handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::docstore::AdminStoreClient;
use crate::services::AdminAuthClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; clients are built once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    store: AdminStoreClient,
    auth: AdminAuthClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let store = AdminStoreClient::new(&config);
        let auth = AdminAuthClient::new(&config);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
                auth,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the privileged store client.
    #[must_use]
    pub fn store(&self) -> &AdminStoreClient {
        &self.inner.store
    }

    /// Get a reference to the auth service client.
    #[must_use]
    pub fn auth(&self) -> &AdminAuthClient {
        &self.inner.auth
    }
}
