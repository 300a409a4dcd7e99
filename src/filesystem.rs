//! Host filesystem operations used by the pipeline.
//!
//! The pipeline only needs a handful of primitives: a file existence check,
//! recursive removal, directory creation and a recursive copy that merges
//! into an existing destination.
//! They sit behind the [`FileOperations`] trait so tests can observe or fail
//! them, with [`LocalFileOperations`] as the real implementation.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Trait for filesystem operations - allows mocking in tests
pub trait FileOperations: Send + Sync {
    /// Returns true if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Removes `path` and everything under it. A missing path is not an error.
    fn remove_recursive(&self, path: &Path) -> Result<()>;

    /// Creates `path` and any missing parents.
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Copies `src` onto `dst`.
    ///
    /// A file is copied to exactly `dst`. A directory has its contents merged
    /// into `dst`: existing files at the same relative path are overwritten,
    /// everything else already under `dst` is left alone.
    fn copy_recursive(&self, src: &Path, dst: &Path) -> Result<()>;
}

/// `FileOperations` backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileOperations;

impl FileOperations for LocalFileOperations {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove_recursive(&self, path: &Path) -> Result<()> {
        debug!("rm -rf {}", path.display());
        let result = match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
            Ok(_) => fs::remove_file(path),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Filesystem {
                message: format!("Failed to remove '{}': {}", path.display(), e),
            }),
        }
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        debug!("mkdir -p {}", path.display());
        fs::create_dir_all(path).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", path.display(), e),
        })
    }

    fn copy_recursive(&self, src: &Path, dst: &Path) -> Result<()> {
        debug!("cp -r {} {}", src.display(), dst.display());
        let meta = fs::metadata(src).map_err(|e| Error::Filesystem {
            message: format!("Cannot copy '{}': {}", src.display(), e),
        })?;

        if !meta.is_dir() {
            return copy_file(src, dst);
        }

        for entry in WalkDir::new(src).follow_links(false) {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to read '{}': {}", src.display(), e),
            })?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| Error::Filesystem {
                    message: format!("Failed to resolve '{}': {}", entry.path().display(), e),
                })?;
            let target = dst.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                unlink_symlink(&target)?;
                self.create_dir(&target)?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                copy_file(entry.path(), &target)?;
            }
        }

        Ok(())
    }
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }

    // Never write through a link left by an earlier copy
    unlink_symlink(dst)?;

    // A directory sitting where the file should go is replaced by the file
    if fs::symlink_metadata(dst).is_ok_and(|m| m.is_dir()) {
        fs::remove_dir_all(dst).map_err(|e| Error::Filesystem {
            message: format!("Failed to replace '{}': {}", dst.display(), e),
        })?;
    }

    fs::copy(src, dst).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to copy '{}' to '{}': {}",
            src.display(),
            dst.display(),
            e
        ),
    })?;
    Ok(())
}

/// Removes `path` if it is a symlink, leaving whatever it points to alone.
fn unlink_symlink(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            debug!("unlink {}", path.display());
            remove_link(path).map_err(|e| Error::Filesystem {
                message: format!("Failed to replace link '{}': {}", path.display(), e),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(not(windows))]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

// Directory symlinks on Windows are removed like directories
#[cfg(windows)]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link = fs::read_link(src)?;
    if fs::symlink_metadata(dst).is_ok() {
        LocalFileOperations.remove_recursive(dst)?;
    }
    std::os::unix::fs::symlink(&link, dst).map_err(|e| Error::Filesystem {
        message: format!("Failed to link '{}' -> '{}': {}", dst.display(), link.display(), e),
    })
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    copy_file(src, dst)
}
