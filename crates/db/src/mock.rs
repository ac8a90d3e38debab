//! Test doubles for the store traits, plus a pool helper for integration tests.

pub mod repositories;

use tokio::sync::OnceCell;

use crate::{create_pool, schema::initialize_database, DbPool};

// Concurrent CREATE TABLE IF NOT EXISTS can still collide in the catalog.
static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();

/// Connects to `TEST_DATABASE_URL` and brings the schema up to date.
///
/// Returns `Ok(None)` when the variable is unset so database tests can skip.
pub async fn create_test_pool() -> eyre::Result<Option<DbPool>> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        return Ok(None);
    };

    let pool = create_pool(&database_url).await?;
    SCHEMA_READY
        .get_or_try_init(|| initialize_database(&pool))
        .await?;

    Ok(Some(pool))
}
