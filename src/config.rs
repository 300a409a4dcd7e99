//! # Deployment Configuration
//!
//! This module holds the two pieces of configuration a deployment needs:
//!
//! - **`DeployConfig`**: the runtime choice made by the operator. It carries a
//!   single [`DeploymentMode`] and is built once at startup, normally from the
//!   `DEPLOY_ENV` environment variable.
//! - **`DeploymentPlan`**: the fixed layout of a deployment. It names the
//!   output directory, the environment files, the two upstream repositories,
//!   the build commands and the artifact manifest. Nothing in it is
//!   configurable; it is derived from [`crate::defaults`] relative to a root
//!   directory.
//!
//! The plan expands into an ordered list of [`Step`]s for a given mode. The
//! pipeline executes exactly that list, and `--dry-run` prints it.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::defaults;
use crate::error::{Error, Result};
use crate::repository::RepositorySpec;

/// Which environment file is staged into the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Development,
    Production,
}

impl DeploymentMode {
    /// Parse an optional raw value, treating `None` and the empty string as unset.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("") => Err(Error::Config {
                message: format!(
                    "Unrecognized environment (unset): {} is not set, stopping deployment",
                    defaults::DEPLOY_ENV_VAR
                ),
                hint: Some(Self::hint()),
            }),
            Some(raw) => raw.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Development => "development",
            DeploymentMode::Production => "production",
        }
    }

    /// Source file staged for this mode, relative to the deployment root.
    pub fn env_file(&self) -> &'static str {
        match self {
            DeploymentMode::Development => defaults::DEV_ENV_FILE,
            DeploymentMode::Production => defaults::PROD_ENV_FILE,
        }
    }

    fn hint() -> String {
        format!(
            "Set {} to 'development' or 'production'",
            defaults::DEPLOY_ENV_VAR
        )
    }
}

impl FromStr for DeploymentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(DeploymentMode::Development),
            "production" => Ok(DeploymentMode::Production),
            other => Err(Error::Config {
                message: format!("Unrecognized environment ({}), stopping deployment", other),
                hint: Some(Self::hint()),
            }),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime configuration passed into the pipeline entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployConfig {
    pub mode: DeploymentMode,
}

impl DeployConfig {
    pub fn new(mode: DeploymentMode) -> Self {
        Self { mode }
    }

    /// Build the configuration from an optional raw mode value.
    pub fn from_value(value: Option<&str>) -> Result<Self> {
        DeploymentMode::parse(value).map(Self::new)
    }

    /// Build the configuration from the `DEPLOY_ENV` environment variable.
    pub fn from_env() -> Result<Self> {
        match env::var(defaults::DEPLOY_ENV_VAR) {
            Ok(value) => Self::from_value(Some(&value)),
            Err(env::VarError::NotPresent) => Self::from_value(None),
            Err(env::VarError::NotUnicode(raw)) => Err(Error::Config {
                message: format!(
                    "Unrecognized environment ({}), stopping deployment",
                    raw.to_string_lossy()
                ),
                hint: Some(DeploymentMode::hint()),
            }),
        }
    }
}

/// The environment files a plan can stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvFiles {
    pub development: PathBuf,
    pub production: PathBuf,
    /// Destination inside the output directory.
    pub staged_as: PathBuf,
}

/// One entry of the artifact manifest.
///
/// `source` is relative to the named repository's working copy and
/// `destination` is relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactCopy {
    pub repository: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ArtifactCopy {
    pub fn new(repository: &str, source: &str, destination: &str) -> Self {
        Self {
            repository: repository.to_string(),
            source: PathBuf::from(source),
            destination: PathBuf::from(destination),
        }
    }
}

/// The fixed layout of a deployment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentPlan {
    pub output_dir: PathBuf,
    pub env_files: EnvFiles,
    /// Synchronized in this order.
    pub repositories: Vec<RepositorySpec>,
    pub build_commands: Vec<String>,
    /// Copied in this order; a later entry overwrites an earlier one at the
    /// same destination.
    pub artifacts: Vec<ArtifactCopy>,
    pub install_command: String,
}

impl DeploymentPlan {
    /// The standard plan, with every path resolved against `root`.
    pub fn standard(root: &Path) -> Self {
        let repos_root = root.join(defaults::REPOS_DIR);
        let backend = defaults::BACKEND_NAME;
        let frontend = defaults::FRONTEND_NAME;

        Self {
            output_dir: root.join(defaults::OUTPUT_DIR),
            env_files: EnvFiles {
                development: root.join(DeploymentMode::Development.env_file()),
                production: root.join(DeploymentMode::Production.env_file()),
                staged_as: PathBuf::from(defaults::STAGED_ENV_FILE),
            },
            repositories: vec![
                RepositorySpec::new(
                    backend,
                    repos_root.join(backend),
                    defaults::BACKEND_REMOTE,
                ),
                RepositorySpec::new(
                    frontend,
                    repos_root.join(frontend),
                    defaults::FRONTEND_REMOTE,
                ),
            ],
            build_commands: defaults::BUILD_COMMANDS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            artifacts: vec![
                ArtifactCopy::new(backend, "dist", "dist"),
                ArtifactCopy::new(frontend, "dist", "dist"),
                ArtifactCopy::new(backend, "app.yaml", "app.yaml"),
                ArtifactCopy::new(backend, "package.json", "package.json"),
                ArtifactCopy::new(backend, "package-lock.json", "package-lock.json"),
                ArtifactCopy::new(frontend, "src/index.html", "dist/index.html"),
            ],
            install_command: defaults::INSTALL_COMMAND.to_string(),
        }
    }

    /// Look up a repository by name.
    pub fn repository(&self, name: &str) -> Option<&RepositorySpec> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Environment file to stage for `mode`.
    pub fn env_source(&self, mode: DeploymentMode) -> &Path {
        match mode {
            DeploymentMode::Development => &self.env_files.development,
            DeploymentMode::Production => &self.env_files.production,
        }
    }

    /// Absolute (source, destination) paths for one manifest entry.
    pub fn resolve_artifact(&self, artifact: &ArtifactCopy) -> Result<(PathBuf, PathBuf)> {
        let repo = self
            .repository(&artifact.repository)
            .ok_or_else(|| Error::Config {
                message: format!(
                    "Artifact '{}' refers to unknown repository '{}'",
                    artifact.source.display(),
                    artifact.repository
                ),
                hint: None,
            })?;

        Ok((
            repo.local_path.join(&artifact.source),
            self.output_dir.join(&artifact.destination),
        ))
    }

    /// Expand the plan into the ordered steps a run performs for `mode`.
    pub fn steps(&self, mode: DeploymentMode) -> Result<Vec<Step>> {
        let mut steps = vec![
            Step::ResetWorkspace {
                path: self.output_dir.clone(),
            },
            Step::StageEnvironment {
                source: self.env_source(mode).to_path_buf(),
                destination: self.output_dir.join(&self.env_files.staged_as),
            },
        ];

        for repo in &self.repositories {
            steps.push(Step::Synchronize {
                repository: repo.clone(),
            });
            for command in &self.build_commands {
                steps.push(Step::Build {
                    repository: repo.name.clone(),
                    command: command.clone(),
                    working_dir: repo.local_path.clone(),
                });
            }
        }

        for artifact in &self.artifacts {
            let (source, destination) = self.resolve_artifact(artifact)?;
            steps.push(Step::CopyArtifact {
                source,
                destination,
            });
        }

        steps.push(Step::Install {
            command: self.install_command.clone(),
            working_dir: self.output_dir.clone(),
        });

        Ok(steps)
    }

    /// Render the plan as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// The four stages a run moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    WorkspaceReset,
    EnvironmentSelection,
    SourceSynchronization,
    ArtifactAssembly,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::WorkspaceReset => "workspace reset",
            Stage::EnvironmentSelection => "environment selection",
            Stage::SourceSynchronization => "source synchronization",
            Stage::ArtifactAssembly => "artifact assembly",
        };
        f.write_str(name)
    }
}

/// A single unit of work in a deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    ResetWorkspace {
        path: PathBuf,
    },
    StageEnvironment {
        source: PathBuf,
        destination: PathBuf,
    },
    Synchronize {
        repository: RepositorySpec,
    },
    Build {
        repository: String,
        command: String,
        working_dir: PathBuf,
    },
    CopyArtifact {
        source: PathBuf,
        destination: PathBuf,
    },
    Install {
        command: String,
        working_dir: PathBuf,
    },
}

impl Step {
    pub fn stage(&self) -> Stage {
        match self {
            Step::ResetWorkspace { .. } => Stage::WorkspaceReset,
            Step::StageEnvironment { .. } => Stage::EnvironmentSelection,
            Step::Synchronize { .. } | Step::Build { .. } => Stage::SourceSynchronization,
            Step::CopyArtifact { .. } | Step::Install { .. } => Stage::ArtifactAssembly,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::ResetWorkspace { path } => write!(f, "reset {}", path.display()),
            Step::StageEnvironment {
                source,
                destination,
            } => write!(f, "stage {} -> {}", source.display(), destination.display()),
            Step::Synchronize { repository } => write!(
                f,
                "sync {} ({}@{}) into {}",
                repository.name,
                repository.remote_url,
                repository.default_branch,
                repository.local_path.display()
            ),
            Step::Build {
                command,
                working_dir,
                ..
            }
            | Step::Install {
                command,
                working_dir,
            } => write!(f, "run `{}` in {}", command, working_dir.display()),
            Step::CopyArtifact {
                source,
                destination,
            } => write!(f, "copy {} -> {}", source.display(), destination.display()),
        }
    }
}
