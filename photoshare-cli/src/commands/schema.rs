//! Schema command - create the photos/users tables and exit

use anyhow::{Context, Result};
use clap::Parser;

use photoshare_server::Database;

/// Arguments for the schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_schema(args: SchemaArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let db = Database::connect(&database_url)
        .await
        .context("Failed to create tables")?;

    tracing::info!(setups = db.schema_setups(), "photos and users tables are ready");
    println!("Schema ready");
    Ok(())
}
