pub mod errors;
pub mod models;
pub mod password;
pub mod repositories;
pub mod schema;

pub mod mock;

use std::time::Duration;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use repositories::{
    accounts::PgAccounts, catalog::PgCatalog, lesson::PgLessonLifecycle,
    time_slot::PgSlotLedger, StoreSettings,
};

pub type DbPool = Pool<Postgres>;

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    create_pool_with(database_url, &PoolSettings::default()).await
}

pub async fn create_pool_with(database_url: &str, settings: &PoolSettings) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await?;

    Ok(pool)
}
