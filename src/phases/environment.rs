//! Phase 2: Environment Selection
//!
//! Copies the env file selected by the deployment mode into the output
//! directory. The mode itself is validated when [`crate::config::DeployConfig`]
//! is built, so by the time this runs the only possible failure is on disk.

use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::filesystem::FileOperations;

/// Execute Phase 2: copy `source` to `destination`.
pub fn execute(files: &dyn FileOperations, source: &Path, destination: &Path) -> Result<()> {
    if !files.is_file(source) {
        return Err(Error::Filesystem {
            message: format!("Environment file '{}' not found", source.display()),
        });
    }

    info!(
        "Staging {} as {}",
        source.display(),
        destination.display()
    );
    files.copy_recursive(source, destination)
}
