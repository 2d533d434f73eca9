//! Migrate command - applies the PostgreSQL schema

use tracing::info;

use crate::infrastructure::storage::run_storage_migrations;

/// Apply pending migrations to the configured database
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pool = crate::connect_postgres(&config).await?;
    let version = run_storage_migrations(&pool).await?;

    info!(version = ?version, "Database is up to date");

    Ok(())
}
