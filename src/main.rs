use color_eyre::eyre::Result;
use dotenv::dotenv;
use tutorbook_api::config::ApiConfig;
use tutorbook_db::{create_pool_with, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // One pool for the whole process, shared by every store
    let db_pool = create_pool_with(&config.database_url, &config.pool_settings()).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start API server
    tutorbook_api::start_server(config, db_pool).await?;

    Ok(())
}
