//! photoshare CLI - serves uploaded photos and provisions the database
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `schema`: create the photos/users tables and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::schema::SchemaArgs;
use commands::serve::ServeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "photoshare",
    author,
    version,
    about = "Photo-sharing backend: upload serving and database setup"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create the database tables if missing, then exit
    Schema(SchemaArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must load before clap reads env-backed arguments
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Schema(args) => commands::run_schema(args).await?,
    }

    Ok(())
}
