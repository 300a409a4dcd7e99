//! # Working Copy Management
//!
//! This module provides the `RepositoryManager`, which keeps a local working
//! copy of an upstream repository current. It is the only place in the
//! pipeline that decides between cloning and updating.
//!
//! ## Design
//!
//! Git access goes through the **`GitOperations`** trait. The application
//! uses `DefaultGitOperations`, which wraps the system `git` command (see
//! [`crate::git`]). Tests swap in mock implementations to simulate clones,
//! pulls and failures without touching the network.
//!
//! ## Synchronization
//!
//! 1.  If the working copy path does not exist, clone the remote into it.
//! 2.  Check out the default branch.
//! 3.  Fast-forward pull from the remote's default branch.
//!
//! An existing directory is trusted to be a clone of the expected remote. If
//! it is not, checkout or pull fails and the error propagates; it is never
//! deleted and re-cloned automatically.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::defaults;
use crate::error::Result;

/// An upstream repository and where its working copy lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySpec {
    pub name: String,
    pub local_path: PathBuf,
    pub remote_url: String,
    pub default_branch: String,
}

impl RepositorySpec {
    /// Creates a spec tracking the default branch.
    pub fn new(name: &str, local_path: PathBuf, remote_url: &str) -> Self {
        Self {
            name: name.to_string(),
            local_path,
            remote_url: remote_url.to_string(),
            default_branch: defaults::DEFAULT_BRANCH.to_string(),
        }
    }
}

/// What synchronization had to do to bring a working copy up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The working copy did not exist and was cloned.
    Cloned,
    /// The working copy existed and was checked out and pulled.
    Updated,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Cloned => f.write_str("cloned"),
            SyncOutcome::Updated => f.write_str("updated"),
        }
    }
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`, which must not exist yet.
    fn clone_repo(&self, url: &str, branch: &str, target_dir: &Path) -> Result<()>;

    /// Switches the working copy to `branch`.
    fn checkout(&self, repo_dir: &Path, branch: &str) -> Result<()>;

    /// Fast-forwards `branch` from the remote.
    fn pull(&self, repo_dir: &Path, branch: &str) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repo(&self, url: &str, branch: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, branch, target_dir)
    }

    fn checkout(&self, repo_dir: &Path, branch: &str) -> Result<()> {
        crate::git::checkout(repo_dir, branch)
    }

    fn pull(&self, repo_dir: &Path, branch: &str) -> Result<()> {
        crate::git::pull(repo_dir, branch)
    }
}

/// Keeps working copies in step with their upstream repositories.
pub struct RepositoryManager {
    git_ops: Box<dyn GitOperations>,
}

impl Default for RepositoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryManager {
    /// Creates a manager backed by the system `git` command.
    pub fn new() -> Self {
        Self {
            git_ops: Box::new(DefaultGitOperations),
        }
    }

    /// Creates a manager with a custom `GitOperations` implementation.
    ///
    /// Used to inject mock git operations.
    pub fn with_operations(git_ops: Box<dyn GitOperations>) -> Self {
        Self { git_ops }
    }

    /// Returns true if a working copy directory is present for `spec`.
    pub fn is_present(&self, spec: &RepositorySpec) -> bool {
        spec.local_path.exists()
    }

    /// Brings the working copy for `spec` up to date with its default branch.
    pub fn synchronize(&self, spec: &RepositorySpec) -> Result<SyncOutcome> {
        let outcome = if self.is_present(spec) {
            debug!(
                "{} exists, assuming it is a working copy of {}",
                spec.local_path.display(),
                spec.remote_url
            );
            info!("Updating {} in {}", spec.name, spec.local_path.display());
            SyncOutcome::Updated
        } else {
            info!("Cloning {} from {}", spec.name, spec.remote_url);
            self.git_ops
                .clone_repo(&spec.remote_url, &spec.default_branch, &spec.local_path)?;
            SyncOutcome::Cloned
        };

        self.git_ops
            .checkout(&spec.local_path, &spec.default_branch)?;
        self.git_ops.pull(&spec.local_path, &spec.default_branch)?;

        Ok(outcome)
    }
}
