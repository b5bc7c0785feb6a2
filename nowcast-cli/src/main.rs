//! Binary crate for the `nowcast` command-line weather display.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering snapshots as text and driving the refresh timer

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.log_level());
    cmd.run().await
}

/// `RUST_LOG` wins unless `--verbose` was given; logs go to stderr.
fn init_tracing(default_level: &str) {
    let filter = if default_level == "debug" {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
