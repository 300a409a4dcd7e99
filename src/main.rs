//! # Deploy Pipeline CLI
//!
//! Binary entry point for `deploy-pipeline`. It parses arguments with `clap`,
//! sets up logging and hands off to the deploy command. All deployment logic
//! lives in the library crate; any error it returns is printed by `anyhow`
//! and the process exits with status 1.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
