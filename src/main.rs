//! deckdiff - stage and publish slide-deck diffs for review
//!
//! CLI binary driving the linear pipeline.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "deckdiff")]
#[command(about = "Stage a pull request's slide-deck diff and publish it for visual review")]
#[command(version)]
struct Cli {
    /// Path to the run configuration file
    #[arg(short, long, default_value = "./config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli::run(&cli.config).await?;
    Ok(())
}
