//! gitas: status of every git repository under a directory

use anyhow::Result;
use clap::Parser;

use gitas::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    Cli::parse().execute().await
}
