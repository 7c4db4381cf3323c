use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool for the hosted proposal database.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url.expose_secret())
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}
