//! Database connection and pool management
//!
//! A single PostgreSQL pool backs all request handlers. Schema management
//! is plain SQL migrations embedded at compile time.

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Timeout for acquiring a connection from the pool
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
/// Idle connections are reaped after this long
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
/// Connections are recycled after this lifetime
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Create a PostgreSQL connection pool with production-ready settings
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(database_url)?
        .application_name("cbs-backend");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!("Database pool created: max={}", max_connections);

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}
