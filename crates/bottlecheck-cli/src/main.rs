mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bottlecheck")]
#[command(about = "Compare retail bottle prices against the catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a batch of scraped products (JSON array) against the catalog.
    Compare {
        /// File containing the scraped products; `-` reads stdin.
        #[arg(long, short)]
        input: PathBuf,
        /// Write the full comparison report as JSON to this file.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Fetch the catalog now, ignoring the cached copy.
    Refresh,
    /// Show the age and size of the cached catalog.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = bottlecheck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cache = bottlecheck_catalog::CatalogCache::from_config(&config)?;

    match cli.command {
        Commands::Compare {
            input,
            output,
            json,
        } => commands::compare(&cache, &input, output.as_deref(), json).await,
        Commands::Refresh => commands::refresh(&cache).await,
        Commands::Status => {
            commands::status(&cache).await;
            Ok(())
        }
    }
}
