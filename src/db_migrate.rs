use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use tutorbook_api::config::ApiConfig;
use tutorbook_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // DATABASE_URL or the DB_* parts, same as the server
    let config = ApiConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Connecting to database...");
    let db_pool = create_pool(&config.database_url).await?;

    initialize_database(&db_pool).await?;
    info!("Database schema initialized successfully.");

    Ok(())
}
