//! Binary crate for the `skycast` terminal weather client.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The terminal UI: search entry, forecast view, hourly modal

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr and stay out of the alternate screen; enable with
    // RUST_LOG and redirect stderr to a file when debugging the TUI.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
