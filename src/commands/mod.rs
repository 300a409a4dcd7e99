//! # CLI Command Implementations
//!
//! The tool has a single command, the deployment run itself. Its arguments
//! are flattened into the top-level CLI so it runs with no subcommand.

pub mod deploy;
