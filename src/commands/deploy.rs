//! Deploy command implementation
//!
//! Runs the full deployment:
//! 1. Reset the output directory
//! 2. Stage the env file for the selected mode
//! 3. Clone or update, then build, each upstream repository
//! 4. Assemble artifacts and install dependencies
//!
//! The deployment mode is validated before anything touches the disk. It comes
//! from `--mode` or, failing that, `DEPLOY_ENV`, which may be set in a `.env`
//! file in the current directory.

use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use std::path::Path;
use std::time::Instant;

use deploy_pipeline::config::{DeployConfig, DeploymentPlan};
use deploy_pipeline::defaults::DOTENV_FILE;
use deploy_pipeline::output::OutputConfig;
use deploy_pipeline::phases::orchestrator::DeploymentPipeline;

/// Arguments for the deploy command
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Deployment mode (development or production) [default: $DEPLOY_ENV]
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Print the steps that would run without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the deployment plan as YAML and exit
    #[arg(long, conflicts_with = "dry_run")]
    pub print_plan: bool,

    /// Suppress all output except errors and command output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the deploy command from the current directory
pub fn execute(args: DeployArgs, color: &str) -> Result<()> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    load_dotenv(&root)?;
    let output = OutputConfig::from_env_and_flag(color, args.quiet);
    execute_in(&root, args, &output)
}

/// Load `<root>/.env` into the process environment.
///
/// Variables already set in the environment are not overridden, and a
/// missing file is not an error.
fn load_dotenv(root: &Path) -> Result<()> {
    let path = root.join(DOTENV_FILE);
    match dotenvy::from_path(&path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to load '{}'", path.display())),
    }
}

fn execute_in(root: &Path, args: DeployArgs, output: &OutputConfig) -> Result<()> {
    let plan = DeploymentPlan::standard(root);

    if args.print_plan {
        print!("{}", plan.to_yaml()?);
        return Ok(());
    }

    let config = match args.mode.as_deref() {
        Some(mode) => DeployConfig::from_value(Some(mode))?,
        None => DeployConfig::from_env()?,
    };

    if args.dry_run {
        let steps = plan.steps(config.mode)?;
        output.dry_run(config.mode, &steps);
        return Ok(());
    }

    let start_time = Instant::now();
    output.header(config.mode);

    match DeploymentPipeline::new(plan).run(&config) {
        Ok(report) => {
            output.success(&report, start_time.elapsed());
            Ok(())
        }
        Err(e) => {
            output.failure();
            let category = e.category();
            Err(e).with_context(|| format!("{} error, stopping deployment", category))
        }
    }
}
