use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotsync_api::config::ApiConfig;
use slotsync_db::{create_pool, schema::initialize_database};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration and start logging
    let config = ApiConfig::from_env()?;
    slotsync_api::init_tracing(config.log_level)?;
    info!("Starting SlotSync API");

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start API server
    slotsync_api::start_server(config, db_pool).await?;

    Ok(())
}
