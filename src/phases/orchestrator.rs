//! Orchestrator for a complete deployment run
//!
//! This module ties the stages together behind [`DeploymentPipeline`]. The
//! pipeline expands its [`DeploymentPlan`] into steps for the configured mode
//! and executes them one at a time, in order, stopping at the first error.
//! Nothing is retried, rolled back or cleaned up on failure.

use std::path::PathBuf;

use log::info;

use super::{phase1, phase2, phase4};
use crate::config::{DeployConfig, DeploymentMode, DeploymentPlan, Stage, Step};
use crate::error::Result;
use crate::filesystem::{FileOperations, LocalFileOperations};
use crate::process::{CommandRunner, ShellCommandRunner};
use crate::repository::{RepositoryManager, SyncOutcome};

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub mode: DeploymentMode,
    /// Each repository with what synchronization did to it, in run order.
    pub synchronized: Vec<(String, SyncOutcome)>,
    pub artifacts_copied: usize,
    pub commands_run: usize,
    pub output_dir: PathBuf,
}

impl DeployReport {
    fn new(mode: DeploymentMode, output_dir: PathBuf) -> Self {
        Self {
            mode,
            synchronized: Vec::new(),
            artifacts_copied: 0,
            commands_run: 0,
            output_dir,
        }
    }

    /// Number of repositories that had to be cloned.
    pub fn cloned(&self) -> usize {
        self.synchronized
            .iter()
            .filter(|(_, outcome)| *outcome == SyncOutcome::Cloned)
            .count()
    }
}

/// Synchronizes, builds and assembles the upstream repositories.
pub struct DeploymentPipeline {
    plan: DeploymentPlan,
    repo_manager: RepositoryManager,
    runner: Box<dyn CommandRunner>,
    files: Box<dyn FileOperations>,
}

impl DeploymentPipeline {
    /// Creates a pipeline using the system `git`, the platform shell and the
    /// local filesystem.
    pub fn new(plan: DeploymentPlan) -> Self {
        Self {
            plan,
            repo_manager: RepositoryManager::new(),
            runner: Box::new(ShellCommandRunner),
            files: Box::new(LocalFileOperations),
        }
    }

    /// Creates a pipeline with custom collaborators.
    pub fn with_operations(
        plan: DeploymentPlan,
        repo_manager: RepositoryManager,
        runner: Box<dyn CommandRunner>,
        files: Box<dyn FileOperations>,
    ) -> Self {
        Self {
            plan,
            repo_manager,
            runner,
            files,
        }
    }

    /// Execute the complete deployment for `config`.
    ///
    /// 1. Reset the output directory
    /// 2. Stage the env file for the configured mode
    /// 3. Synchronize and build each repository, backend first
    /// 4. Copy the artifact manifest and install dependencies
    pub fn run(&self, config: &DeployConfig) -> Result<DeployReport> {
        let steps = self.plan.steps(config.mode)?;
        let mut report = DeployReport::new(config.mode, self.plan.output_dir.clone());
        let mut current_stage: Option<Stage> = None;

        for step in &steps {
            let stage = step.stage();
            if current_stage != Some(stage) {
                info!("==> {}", stage);
                current_stage = Some(stage);
            }
            self.execute_step(step, &mut report)?;
        }

        Ok(report)
    }

    fn execute_step(&self, step: &Step, report: &mut DeployReport) -> Result<()> {
        match step {
            Step::ResetWorkspace { path } => phase1::execute(self.files.as_ref(), path),
            Step::StageEnvironment {
                source,
                destination,
            } => phase2::execute(self.files.as_ref(), source, destination),
            Step::Synchronize { repository } => {
                let outcome = self.repo_manager.synchronize(repository)?;
                report
                    .synchronized
                    .push((repository.name.clone(), outcome));
                Ok(())
            }
            Step::Build {
                repository,
                command,
                working_dir,
            } => {
                info!("Building {}: {}", repository, command);
                self.runner.run(command, working_dir)?;
                report.commands_run += 1;
                Ok(())
            }
            Step::CopyArtifact {
                source,
                destination,
            } => {
                phase4::execute(self.files.as_ref(), source, destination)?;
                report.artifacts_copied += 1;
                Ok(())
            }
            Step::Install {
                command,
                working_dir,
            } => {
                info!("Installing dependencies in {}", working_dir.display());
                self.runner.run(command, working_dir)?;
                report.commands_run += 1;
                Ok(())
            }
        }
    }
}
