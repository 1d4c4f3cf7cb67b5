//! Connectivity check for `DATABASE_URL`.
//!
//! Prints the server time and Postgres version, exits non-zero on failure.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vibetj_core::core::config::DatabaseConfig;
use vibetj_core::core::database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("Testing database connection...");
    let pool = database::create_pool(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

    let info = database::probe(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Database query failed: {}", e))?;

    tracing::info!("Database connection successful");
    println!("Server time: {}", info.time);
    println!("PostgreSQL version: {}", info.version);

    pool.close().await;
    Ok(())
}
