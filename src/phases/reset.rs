//! Phase 1: Workspace Reset
//!
//! Guarantees the output directory exists, is a directory, and is empty.
//! Whatever a previous run left there is deleted; nothing from it is reused.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::filesystem::FileOperations;

/// Execute Phase 1: remove `path` recursively and create it again empty.
pub fn execute(files: &dyn FileOperations, path: &Path) -> Result<()> {
    info!("Resetting workspace {}", path.display());
    files.remove_recursive(path)?;
    files.create_dir(path)
}
