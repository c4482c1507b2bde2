use anyhow::Result;
use sqlx::migrate::MigrateDatabase;

mod seed;
mod server;

pub use seed::{SAMPLE_PASSWORD, SeedSummary, seed};
pub use server::serve;

use crate::config::Config;

async fn state(config: &Config) -> Result<nikjin_shared::State> {
    let write_db = crate::db::create_write_pool(&config.database.url).await?;
    let read_db =
        crate::db::create_read_pool(&config.database.url, config.database.max_connections).await?;

    Ok(nikjin_shared::State { read_db, write_db })
}

#[tracing::instrument(skip(config))]
pub async fn migrate(config: &Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = crate::db::create_write_pool(&config.database.url).await?;
    nikjin_db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn reset(config: &Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

pub async fn seed_command(config: &Config) -> Result<()> {
    migrate(config).await?;

    let state = state(config).await?;
    seed(state.clone()).await?;

    state.read_db.close().await;
    state.write_db.close().await;

    Ok(())
}
