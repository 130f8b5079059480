//! Process-wide PostgreSQL pool.
//!
//! The pool is created at most once per process and lives until exit.
//! A second initialization attempt fails with
//! `StoreError::AlreadyInitialized` instead of opening another pool.

use once_cell::sync::OnceCell;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::StoreConfig;
use crate::ports::StoreError;

static POOL: OnceCell<PgPool> = OnceCell::new();

/// Connects, runs embedded migrations, and installs the process-wide pool.
///
/// # Errors
///
/// - `StoreError::AlreadyInitialized` if a pool is already installed
/// - `StoreError::Unavailable` if no `DATABASE_URL` is configured or the
///   connection cannot be established
/// - `StoreError::Database` if migrations fail
pub async fn init_pool(config: &StoreConfig) -> Result<&'static PgPool, StoreError> {
    if POOL.get().is_some() {
        return Err(StoreError::AlreadyInitialized);
    }

    let url = config
        .database_url()
        .ok_or_else(|| StoreError::Unavailable("DATABASE_URL not configured".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(url.expose_secret())
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to connect: {}", e)))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| StoreError::Database(format!("Migration failed: {}", e)))?;

    // Two concurrent initializers can both get here; only one wins.
    POOL.set(pool).map_err(|_| StoreError::AlreadyInitialized)?;
    POOL.get().ok_or(StoreError::AlreadyInitialized)
}
