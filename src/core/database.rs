use crate::core::config::DatabaseConfig;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Server clock and version reported by a connectivity probe
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServerInfo {
    pub time: DateTime<Utc>,
    pub version: String,
}

/// Round-trip a trivial query to prove the pool can reach the server
pub async fn probe(pool: &PgPool) -> Result<ServerInfo, sqlx::Error> {
    sqlx::query_as::<_, ServerInfo>("SELECT NOW() AS time, version() AS version")
        .fetch_one(pool)
        .await
}
