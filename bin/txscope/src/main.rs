//! txscope - live list of value transfers in the most recent Ethereum blocks.

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod input;
mod table;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // stdout belongs to the table.
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    cli.run().await
}
