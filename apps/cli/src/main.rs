//! napcite CLI — NAP citation research and generation tool.
//!
//! Extracts business Name/Address/Phone data from a map listing, checks
//! its presence across local business directories, and generates citation
//! text plus a plain-text report for the directories where it is missing.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
