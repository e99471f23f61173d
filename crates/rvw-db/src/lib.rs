pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

use std::time::Duration;

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

pub use config::DatabaseConfig;
pub use error::{InvalidConfig, StoreError};
pub use memory::MemoryReviewStore;
pub use models::{ReviewRecord, ReviewRow};
pub use store::{PgReviewStore, ReviewStore};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(5 * 60))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Run the migrations in this crate's `migrations/` folder.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Bundled at compile time from `migrations/`
    sqlx::migrate!()
        .run(pool)
        .await
        .context("failed to run database migrations")?;

    Ok(())
}
