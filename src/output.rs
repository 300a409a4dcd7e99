//! # Console Output
//!
//! Progress headers and the final summary printed for the operator. Build
//! output streamed from child processes and log records do not go through
//! here.
//!
//! Color and emoji use follows the `--color=always|never|auto` flag. In auto
//! mode the environment decides:
//! - `NO_COLOR` (any value) disables colors (https://no-color.org/)
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even when stdout is not a TTY
//! - `TERM=dumb` disables colors

use std::env;
use std::time::Duration;

use crate::config::{DeploymentMode, Step};
use crate::phases::orchestrator::DeployReport;

/// Output configuration for controlling colors, emojis and chattiness.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Suppress headers and summaries.
    pub quiet: bool,
}

impl OutputConfig {
    /// Create an output configuration from the environment and the `--color` flag.
    pub fn from_env_and_flag(color_flag: &str, quiet: bool) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color, quiet }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// The emoji when colors are enabled, the plain marker otherwise.
    pub fn marker<'a>(&self, emoji: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            emoji
        } else {
            plain
        }
    }

    pub fn header(&self, mode: DeploymentMode) {
        if self.quiet {
            return;
        }
        println!("{} Deploying ({})", self.marker("🚀", "[DEPLOY]"), mode);
        println!();
    }

    pub fn dry_run(&self, mode: DeploymentMode, steps: &[Step]) {
        if !self.quiet {
            println!(
                "{} DRY RUN ({}) - No changes will be made",
                self.marker("🔎", "[DRY RUN]"),
                mode
            );
            println!();
        }
        for (index, step) in steps.iter().enumerate() {
            println!("{:>2}. [{}] {}", index + 1, step.stage(), step);
        }
    }

    pub fn success(&self, report: &DeployReport, elapsed: Duration) {
        if self.quiet {
            return;
        }
        println!(
            "{} Deployed successfully in {:.2}s",
            self.marker("✅", "[OK]"),
            elapsed.as_secs_f64()
        );
        for (name, outcome) in &report.synchronized {
            println!("   {}: {}", name, outcome);
        }
        println!("   {} artifacts copied", report.artifacts_copied);
        println!("   Output written to: {}", report.output_dir.display());
    }

    pub fn failure(&self) {
        if self.quiet {
            return;
        }
        println!("{} Deployment failed", self.marker("❌", "[FAILED]"));
        println!();
    }
}
