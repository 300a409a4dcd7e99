//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_env_files();
//! fixture.command().arg("--dry-run").assert().success();
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

use assert_fs::prelude::*;
use deploy_pipeline::error::{Error, Result};
use deploy_pipeline::filesystem::{FileOperations, LocalFileOperations};
use deploy_pipeline::process::{CommandOutput, CommandRunner};
use deploy_pipeline::repository::GitOperations;
use walkdir::WalkDir;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{env_contents, snapshot, CallLog, FakeGit, FakeRunner, TestFixture};
}

/// Contents of the staged env sources.
pub mod env_contents {
    pub const DEV: &str = "API_URL=http://localhost:3000\nLOG_LEVEL=debug\n";
    pub const PROD: &str = "API_URL=https://aljcepeda.com\nLOG_LEVEL=warn\n";
}

/// A test fixture that provides a temporary deployment root.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add `.env.dev` and `.env.prod`.
    pub fn with_env_files(self) -> Self {
        self.with_file(".env.dev", env_contents::DEV)
            .with_file(".env.prod", env_contents::PROD)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a simulated upstream for both repositories under `upstream/`.
    pub fn with_upstreams(self) -> Self {
        self.with_file("upstream/ajc-back/src/main.js", "console.log('api v1')")
            .with_file("upstream/ajc-back/dist/index.html", "placeholder")
            .with_file("upstream/ajc-back/app.yaml", "runtime: nodejs18\n")
            .with_file("upstream/ajc-back/package.json", r#"{"name":"ajc-back"}"#)
            .with_file(
                "upstream/ajc-back/package-lock.json",
                r#"{"name":"ajc-back","lockfileVersion":3}"#,
            )
            .with_file("upstream/ajc-front/src/main.js", "render('v1')")
            .with_file("upstream/ajc-front/src/index.html", "<html>front v1</html>")
            .with_file("upstream/ajc-front/package.json", r#"{"name":"ajc-front"}"#)
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn upstream_dir(&self) -> PathBuf {
        self.path().join("upstream")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// `DEPLOY_ENV` is cleared so the caller's environment never leaks in.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("deploy-pipeline");
        cmd.current_dir(self.path()).env_remove("DEPLOY_ENV");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Every file under `dir`, keyed by relative path.
#[allow(dead_code)]
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(|e| e.expect("walk"))
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (relative, fs::read(e.path()).expect("read"))
        })
        .collect()
}

/// Ordered record of collaborator calls shared between fakes.
#[allow(dead_code)]
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[allow(dead_code)]
fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Git fake backed by plain directories.
///
/// A remote URL is a directory; cloning and pulling copy it over the working
/// copy, which is how a fast-forward looks from the outside.
#[allow(dead_code)]
pub struct FakeGit {
    pub log: CallLog,
    pub fail_on: Option<String>,
}

#[allow(dead_code)]
impl FakeGit {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail_on: None,
        }
    }

    /// Fail the given operation (`clone`, `checkout` or `pull`) with a git error.
    pub fn failing(log: &CallLog, operation: &str) -> Self {
        Self {
            log: log.clone(),
            fail_on: Some(operation.to_string()),
        }
    }

    fn record(&self, operation: &str, target: &Path) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {}", operation, name_of(target)));
        if self.fail_on.as_deref() == Some(operation) {
            return Err(Error::GitCommand {
                command: operation.to_string(),
                path: target.display().to_string(),
                stderr: "fatal: unable to access remote".to_string(),
                hint: None,
            });
        }
        Ok(())
    }
}

impl GitOperations for FakeGit {
    fn clone_repo(&self, url: &str, _branch: &str, target_dir: &Path) -> Result<()> {
        self.record("clone", target_dir)?;
        LocalFileOperations.copy_recursive(Path::new(url), target_dir)
    }

    fn checkout(&self, repo_dir: &Path, _branch: &str) -> Result<()> {
        self.record("checkout", repo_dir)
    }

    fn pull(&self, repo_dir: &Path, _branch: &str) -> Result<()> {
        self.record("pull", repo_dir)?;
        // Upstream lives next to the repos root under the same name
        let upstream = repo_dir
            .parent()
            .and_then(Path::parent)
            .map(|root| root.join("upstream").join(name_of(repo_dir)))
            .expect("working copy has a root");
        LocalFileOperations.copy_recursive(&upstream, repo_dir)
    }
}

/// Command fake emulating npm.
///
/// `npm run build` turns `src/main.js` into `dist/<repo>.js`; `npm ci` leaves
/// a marker under `node_modules` holding the lockfile it saw.
#[allow(dead_code)]
pub struct FakeRunner {
    pub log: CallLog,
    pub fail_on: Option<String>,
}

#[allow(dead_code)]
impl FakeRunner {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail_on: None,
        }
    }

    pub fn failing(log: &CallLog, command: &str) -> Self {
        Self {
            log: log.clone(),
            fail_on: Some(command.to_string()),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str, working_dir: &Path) -> Result<CommandOutput> {
        let name = name_of(working_dir);
        self.log
            .lock()
            .unwrap()
            .push(format!("run {} in {}", command, name));

        if self.fail_on.as_deref() == Some(command) {
            return Err(Error::Build {
                command: command.to_string(),
                working_dir: working_dir.display().to_string(),
                status: "exit status: 1".to_string(),
            });
        }

        match command {
            "npm run build" => {
                let source = fs::read(working_dir.join("src/main.js"))?;
                fs::create_dir_all(working_dir.join("dist"))?;
                fs::write(working_dir.join("dist").join(format!("{}.js", name)), source)?;
            }
            "npm ci" => {
                let lock = fs::read(working_dir.join("package-lock.json")).unwrap_or_default();
                fs::create_dir_all(working_dir.join("node_modules"))?;
                fs::write(working_dir.join("node_modules/.package-lock.json"), lock)?;
            }
            _ => {}
        }

        Ok(CommandOutput {
            status: success(),
            stdout: format!("{} ok\n", command),
            stderr: String::new(),
        })
    }
}

#[cfg(unix)]
#[allow(dead_code)]
fn success() -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(0)
}

#[cfg(windows)]
#[allow(dead_code)]
fn success() -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(0)
}
