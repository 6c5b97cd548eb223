//! Creates the catalog database and seeds its reference data.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed -- --config config.yml
//! ```

use std::path::PathBuf;

use anyhow::Context;
use catalog::config::DEFAULT_CONFIG_PATH;
use catalog::{AppConfig, Database, load_config};
use clap::Parser;
use seed_data::db::{SeedSummary, Seeder};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "seed",
    about = "Formations catalog seeder",
    long_about = "Create the catalog database and tables, then insert formations, types, courses and trainings"
)]
struct SeedArgs {
    /// Path to the YAML configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = SeedArgs::parse();

    info!("Loading configuration from {}", args.config.display());
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    info!("  Database: {}", config.database.name);
    info!("  Host: {}", config.database.host);
    info!("  Timezone: {}", config.app.timezone);

    let mut db = Database::new(config.database.clone());
    let result = bootstrap(&mut db, &config).await;
    db.close().await;

    let summary = result?;

    // Row-level problems never change the exit status.
    if let Some(problems) = summary.problems() {
        warn!("Seeding finished with {problems}");
    }
    info!("Catalog database ready");
    Ok(())
}

/// Everything between connecting and closing. The caller closes the
/// connection whatever the outcome.
async fn bootstrap(db: &mut Database, config: &AppConfig) -> anyhow::Result<SeedSummary> {
    db.connect().await.context("Failed to connect to database")?;
    db.create_database()
        .await
        .context("Failed to create database")?;
    db.create_tables().await.context("Failed to create tables")?;

    let summary = Seeder::from_file(db, &config.app.data_file)
        .insert_all()
        .await;
    Ok(summary)
}
