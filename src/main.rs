#![warn(clippy::all, clippy::pedantic)]

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use valet::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    valet::cli::run(cli).await
}
