//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::Parser;

use crate::commands;

/// Deploy Pipeline - Synchronize, build and assemble the deployable app
#[derive(Parser, Debug)]
#[command(name = "deploy-pipeline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    deploy: commands::deploy::DeployArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        commands::deploy::execute(self.deploy, &self.color)
    }
}

/// Initialise `env_logger`, letting `RUST_LOG` override the flag.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
