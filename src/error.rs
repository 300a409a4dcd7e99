//! # Error Handling
//!
//! This module defines the centralized error type for `deploy-pipeline`. It
//! uses the `thiserror` library to build one `Error` enum covering every
//! failure the pipeline can run into, with enough context in each variant for
//! an operator to act on the message without reading logs.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure that can abort a deployment run.
//! - **`ErrorCategory`**: the coarse class an error belongs to (configuration,
//!   filesystem, source control or build).
//! - **`Result<T>`**: alias for `std::result::Result<T, Error>`.
//!
//! No error is handled locally inside the pipeline. Every variant propagates
//! to the binary, which prints it and exits with a failure status.

use std::fmt;
use thiserror::Error;

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// Main error type for deploy-pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    /// The deployment configuration is missing or invalid.
    ///
    /// Raised before any filesystem, network or build work starts.
    #[error("Configuration error: {message}{}", hint_suffix(hint))]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration
        hint: Option<String>,
    },

    /// Cloning a repository failed.
    #[error("Git clone error for {url}@{branch}: {message}{}", hint_suffix(hint))]
    GitClone {
        url: String,
        branch: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// A git command run inside an existing working copy failed.
    #[error("Git command failed in {path}: {command} - {stderr}{}", hint_suffix(hint))]
    GitCommand {
        command: String,
        path: String,
        stderr: String,
        hint: Option<String>,
    },

    /// A filesystem operation (reset, copy, directory creation) failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A build or install command exited unsuccessfully.
    #[error("Build command failed in {working_dir}: `{command}` exited with {status}")]
    Build {
        command: String,
        working_dir: String,
        status: String,
    },

    /// A command could not be started at all.
    #[error("Failed to run `{command}`: {message}")]
    CommandSpawn { command: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML serialization error, wrapped from `serde_yaml::Error`.
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The class of failure an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Filesystem,
    SourceControl,
    Build,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Filesystem => "filesystem",
            ErrorCategory::SourceControl => "source control",
            ErrorCategory::Build => "build",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Returns the category this error falls under.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config { .. } | Error::Yaml(_) => ErrorCategory::Configuration,
            Error::Filesystem { .. } | Error::Io(_) => ErrorCategory::Filesystem,
            Error::GitClone { .. } | Error::GitCommand { .. } => ErrorCategory::SourceControl,
            Error::Build { .. } | Error::CommandSpawn { .. } => ErrorCategory::Build,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
