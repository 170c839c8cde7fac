//! One-shot database setup: creates the schema and inserts the sample rows

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::{
    database::{DatabaseConfig, init_pool},
    schema::{SAMPLE_PASSWORD, create_schema, seed_sample_data},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Setting up survey database");

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    create_schema(&pool).await?;
    let summary = seed_sample_data(&pool).await?;

    info!(
        "Database setup completed ({} users, {} surveys, {} questions added)",
        summary.users, summary.surveys, summary.questions
    );
    for email in [
        "john.doe@example.com",
        "sarah.chen@example.com",
        "alex.rodriguez@example.com",
    ] {
        info!("Sample user {} (password: {})", email, SAMPLE_PASSWORD);
    }

    pool.close().await;
    Ok(())
}
