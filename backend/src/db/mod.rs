//! Database connection and pool management
//!
//! The pool created here is the only handle to the store. It is owned by
//! [`AppState`](crate::state::AppState) and handed to every handler, so no
//! module keeps a global connection.

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Pool tuning that is not exposed through configuration
pub struct PoolTuning {
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

/// Create a PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    create_pool_with_tuning(config, &PoolTuning::default()).await
}

/// Create a PostgreSQL connection pool with explicit tuning
pub async fn create_pool_with_tuning(
    config: &DatabaseConfig,
    tuning: &PoolTuning,
) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)?.application_name("power-bills");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(tuning.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(tuning.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(tuning.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(tuning.max_lifetime_secs))
        .connect_with(connect_options)
        .await?;

    info!(
        max = config.max_connections,
        min = tuning.min_connections,
        "Database pool created"
    );

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_tuning() {
        let tuning = PoolTuning::default();
        assert_eq!(tuning.min_connections, 1);
        assert_eq!(tuning.acquire_timeout_secs, 30);
        assert_eq!(tuning.max_lifetime_secs, 1800);
    }
}
