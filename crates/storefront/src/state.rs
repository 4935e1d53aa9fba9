//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::docstore::DocStoreClient;
use crate::services::auth::{AuthClient, AuthContext};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the session database pool, and the
/// clients for the two hosted services. The clients are built once at
/// startup and live for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    docstore: DocStoreClient,
    auth: AuthClient,
    auth_context: AuthContext,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Spawns the auth-context initialization task as a side effect.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let docstore = DocStoreClient::new(&config.docstore);
        let auth = AuthClient::new(&config.auth_service);
        let auth_context = AuthContext::start(auth.clone(), crate::services::auth::RETRY_DELAY);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                docstore,
                auth,
                auth_context,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the document store client.
    #[must_use]
    pub fn docstore(&self) -> &DocStoreClient {
        &self.inner.docstore
    }

    /// Get a reference to the auth service client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the auth readiness context.
    #[must_use]
    pub fn auth_context(&self) -> &AuthContext {
        &self.inner.auth_context
    }
}
