//! Shared deterministic types for deploy orchestration.
//!
//! These types define the contracts between the orchestrator and its
//! collaborators. They carry no I/O handles.

use std::path::PathBuf;

use crate::exit_codes;

/// Result of comparing the output folder with the build's expected targets.
///
/// Paths are relative to the site root and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Present under the output folder but not produced by the current build.
    pub stale: Vec<PathBuf>,
    /// Expected by the build but absent on disk.
    pub missing: Vec<PathBuf>,
}

/// A stale file that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Terminal state of a deploy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Output folder committed and pushed to the deploy branch.
    Published,
    /// The import helper is not installed; nothing ran.
    MissingDependency { helper: String },
    /// The build exited non-zero; nothing was deleted or published.
    BuildFailed { code: i32 },
    /// One or more stale files survived cleanup; nothing was published.
    CleanupFailed { failures: Vec<RemovalFailure> },
    /// The import helper exited non-zero.
    PublishFailed { command: Vec<String>, code: i32 },
}

impl DeployOutcome {
    /// Process exit code for this outcome.
    ///
    /// Build and publish failures surface the external tool's own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployOutcome::Published => exit_codes::OK,
            DeployOutcome::MissingDependency { .. } => exit_codes::MISSING_DEPENDENCY,
            DeployOutcome::BuildFailed { code } => *code,
            DeployOutcome::CleanupFailed { .. } => exit_codes::CLEANUP_FAILED,
            DeployOutcome::PublishFailed { code, .. } => *code,
        }
    }
}
