//! # SaaS DB
//!
//! Database pool and migrations for the SaaS permissions service.
//!
//! # Example
//!
//! ```ignore
//! use saas_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&settings.database).await?;
//! run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use saas_config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and should be stored in the
/// application state rather than re-created per request.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

/// Builds a pool that connects on first use.
///
/// Used where the service has to start without the database being reachable
/// yet, for example routing tests that never touch storage.
pub fn init_lazy_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&config.url)
}

/// Applies pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
