//! Implementation of the 4 stages of a deployment run.
//!
//! ## Overview
//!
//! A run follows 4 stages, strictly in sequence:
//! 1. Workspace Reset - Remove and recreate the output directory
//! 2. Environment Selection - Stage the env file chosen by the deployment mode
//! 3. Source Synchronization - Clone or update each working copy, then build it
//! 4. Artifact Assembly - Copy the artifact manifest into the output directory
//!    and install dependencies there
//!
//! Synchronization itself lives in [`crate::repository`] and command execution
//! in [`crate::process`]; the orchestrator calls them directly. The modules
//! here cover the filesystem-side stages and the orchestration.

pub mod assembly;
pub mod environment;
pub mod orchestrator;
pub mod reset;

// Re-export stage modules by position in the run
pub use assembly as phase4;
pub use environment as phase2;
pub use reset as phase1;
