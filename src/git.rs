//! Thin wrappers around the system `git` command.
//!
//! Using the system binary means SSH keys from `~/.ssh/`, credential helpers
//! and anything configured in `~/.gitconfig` apply exactly as they would for
//! the operator running git by hand.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};

fn looks_like_auth_failure(stderr: &str) -> bool {
    stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
}

fn auth_hint() -> String {
    "Make sure you have access to the repository: SSH key added to ssh-agent, \
     git credentials configured, or a personal access token set up"
        .to_string()
}

/// Clone `url` into `target_dir`, creating parent directories as needed.
///
/// The target must not already exist; callers decide between cloning and
/// updating by checking for it first.
pub fn clone(url: &str, branch: &str, target_dir: &Path) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }

    debug!("git clone {} {}", url, target_dir.display());
    let output = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            branch: branch.to_string(),
            message: e.to_string(),
            hint: Some("Is git installed and on PATH?".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let hint = looks_like_auth_failure(&stderr).then(auth_hint);
        return Err(Error::GitClone {
            url: url.to_string(),
            branch: branch.to_string(),
            message: stderr,
            hint,
        });
    }

    Ok(())
}

/// Switch the working copy at `repo_dir` to `branch`.
pub fn checkout(repo_dir: &Path, branch: &str) -> Result<()> {
    run_in(repo_dir, &["checkout", branch]).map(|_| ())
}

/// Fast-forward `branch` in `repo_dir` to `origin/<branch>`.
///
/// Refuses to create a merge commit, so a rewritten upstream history fails
/// instead of producing a divergent local branch.
pub fn pull(repo_dir: &Path, branch: &str) -> Result<()> {
    match run_in(repo_dir, &["pull", "--ff-only", "origin", branch]) {
        Ok(_) => Ok(()),
        Err(Error::GitCommand {
            command,
            path,
            stderr,
            ..
        }) => {
            let hint = if stderr.contains("fast-forward") {
                Some(format!(
                    "Upstream '{}' cannot be fast-forwarded; remove '{}' to re-clone it",
                    branch, path
                ))
            } else if looks_like_auth_failure(&stderr) {
                Some(auth_hint())
            } else {
                None
            };
            Err(Error::GitCommand {
                command,
                path,
                stderr,
                hint,
            })
        }
        Err(e) => Err(e),
    }
}

/// Run `git <args>` inside `repo_dir`, failing on a non-zero exit.
fn run_in(repo_dir: &Path, args: &[&str]) -> Result<Output> {
    let command = args.join(" ");
    debug!("git {} (in {})", command, repo_dir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            path: repo_dir.display().to_string(),
            stderr: e.to_string(),
            hint: None,
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            path: repo_dir.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            hint: None,
        });
    }

    Ok(output)
}
