//! # Deploy Pipeline Library
//!
//! This library synchronizes two upstream repositories, builds them, and
//! assembles their artifacts into a single deployable directory. It backs the
//! `deploy-pipeline` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use deploy_pipeline::config::{DeployConfig, DeploymentPlan};
//! use std::path::Path;
//!
//! let config = DeployConfig::from_value(Some("production")).unwrap();
//! let plan = DeploymentPlan::standard(Path::new("/srv/site"));
//!
//! let steps = plan.steps(config.mode).unwrap();
//! assert_eq!(steps.first().unwrap().to_string(), "reset /srv/site/app");
//!
//! assert!(DeployConfig::from_value(Some("staging")).is_err());
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the deployment mode chosen at startup and
//!   the fixed plan describing paths, repositories, commands and the artifact
//!   manifest.
//! - **Working copies (`repository`, `git`)**: clone-or-update logic behind the
//!   `GitOperations` trait, backed by the system `git` command.
//! - **Commands (`process`)**: build and install commands behind the
//!   `CommandRunner` trait, with output streamed to the console.
//! - **Filesystem (`filesystem`)**: removal, creation and merging copies behind
//!   the `FileOperations` trait.
//! - **Phases (`phases`)**: the staged run and its orchestrator.
//!
//! ## Execution Flow
//!
//! `phases::orchestrator::DeploymentPipeline::run` executes, strictly in order:
//!
//! 1.  **Workspace Reset**: remove and recreate the output directory.
//! 2.  **Environment Selection**: stage `.env.dev` or `.env.prod` as `.env`.
//! 3.  **Source Synchronization**: clone or update each repository and build it.
//! 4.  **Artifact Assembly**: copy the manifest and install dependencies.
//!
//! The first error stops the run. Nothing is retried or rolled back.

pub mod config;
pub mod defaults;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod output;
pub mod phases;
pub mod process;
pub mod repository;
