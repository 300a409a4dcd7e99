//! Default values for deploy-pipeline.
//!
//! The deployment layout is fixed: every path here is resolved relative to the
//! directory the tool is started from. Keeping the constants in one place
//! keeps the plan, the CLI and the tests in agreement.

/// Environment variable selecting the deployment mode.
pub const DEPLOY_ENV_VAR: &str = "DEPLOY_ENV";

/// Output directory that is reset on every run.
pub const OUTPUT_DIR: &str = "app";

/// Root directory holding the cached working copies.
pub const REPOS_DIR: &str = "repos";

/// Environment file staged for `development`.
pub const DEV_ENV_FILE: &str = ".env.dev";

/// Environment file staged for `production`.
pub const PROD_ENV_FILE: &str = ".env.prod";

/// File in the deployment root loaded into the process environment at startup.
pub const DOTENV_FILE: &str = ".env";

/// Name of the staged environment file inside the output directory.
pub const STAGED_ENV_FILE: &str = ".env";

/// Branch every working copy is kept on.
pub const DEFAULT_BRANCH: &str = "master";

pub const BACKEND_NAME: &str = "ajc-back";
pub const BACKEND_REMOTE: &str = "git@github.com:ALJCepeda/ajcepeda-back.git";

pub const FRONTEND_NAME: &str = "ajc-front";
pub const FRONTEND_REMOTE: &str = "git@github.com:ALJCepeda/ajcepeda-front.git";

/// Commands run inside each working copy after it is synchronized.
pub const BUILD_COMMANDS: &[&str] = &["npm ci", "npm run build"];

/// Command run inside the output directory once artifacts are assembled.
pub const INSTALL_COMMAND: &str = "npm ci";
