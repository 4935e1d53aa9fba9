//! Session-table migrations.
//!
//! Both binaries keep only tower-sessions state in `PostgreSQL`; the
//! store ships its own schema, so "migrating" means asking it to create
//! its table. Run per database because the two binaries use separate
//! databases in production.

use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors from the migrate commands.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the storefront session table.
///
/// # Errors
///
/// Returns an error if `STOREFRONT_DATABASE_URL` is missing or the
/// migration fails.
pub async fn storefront() -> Result<(), MigrateError> {
    migrate_database("STOREFRONT_DATABASE_URL").await
}

/// Create the admin session table.
///
/// # Errors
///
/// Returns an error if `ADMIN_DATABASE_URL` is missing or the migration
/// fails.
pub async fn admin() -> Result<(), MigrateError> {
    migrate_database("ADMIN_DATABASE_URL").await
}

async fn migrate_database(env_key: &str) -> Result<(), MigrateError> {
    let _ = dotenvy::dotenv();

    let database_url = database_url_from(env_key)?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(secrecy::ExposeSecret::expose_secret(&database_url))
        .await?;

    let store = PostgresStore::new(pool);
    store.migrate().await?;

    tracing::info!(database = env_key, "session table ready");
    Ok(())
}

fn database_url_from(primary_key: &str) -> Result<SecretString, MigrateError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(MigrateError::MissingEnvVar(primary_key.to_string()))
}
