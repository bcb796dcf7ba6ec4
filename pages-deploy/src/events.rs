//! Operator-facing deploy events.
//!
//! The orchestrator reports progress through an [`EventSink`] handed to it at
//! construction. [`TracingSink`] turns events into log lines; tests record
//! them instead.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

/// Something the operator should hear about during a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    /// The import helper could not be run.
    DependencyMissing { helper: String },
    /// The build exited non-zero.
    BuildFailed { code: i32 },
    /// A stale output file was removed.
    StaleRemoved { path: PathBuf },
    /// A stale output file could not be removed.
    StaleRemoveFailed { path: PathBuf, error: String },
    /// The build lists a target that is not on disk.
    ExpectedMissing { path: PathBuf },
    /// `GITHUB_PULL_BEFORE_COMMIT` is set but has no effect.
    PullIgnored,
    /// About to run the import helper with this command line.
    Publishing { command: Vec<String> },
    /// The import helper exited non-zero.
    PublishFailed { command: Vec<String>, code: i32 },
    /// The deploy branch was pushed.
    Published { remote: String, branch: String },
}

/// Receiver for deploy events.
pub trait EventSink {
    fn on_event(&self, event: DeployEvent);
}

/// Sink that writes events as `tracing` log lines.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::DependencyMissing { helper } => {
                error!(
                    helper = %helper,
                    "In order to deploy the site to GitHub pages, you must install \"{helper}\""
                );
                error!("Exiting due to missing dependencies.");
            }
            DeployEvent::BuildFailed { code } => {
                error!(code, "Build failed, not deploying to GitHub");
            }
            DeployEvent::StaleRemoved { path } => {
                debug!(path = %path.display(), "removed stale output file");
            }
            DeployEvent::StaleRemoveFailed { path, error } => {
                warn!(path = %path.display(), err = %error, "failed to remove stale output file");
            }
            DeployEvent::ExpectedMissing { path } => {
                warn!(path = %path.display(), "expected build target missing from output");
            }
            DeployEvent::PullIgnored => {
                debug!("GITHUB_PULL_BEFORE_COMMIT is set but has no effect");
            }
            DeployEvent::Publishing { command } => {
                info!("==> {command:?}");
            }
            DeployEvent::PublishFailed { command, code } => {
                error!("Failed GitHub deployment: command {command:?} returned {code}");
            }
            DeployEvent::Published { remote, branch } => {
                debug!(remote = %remote, branch = %branch, "deploy branch pushed");
            }
        }
    }
}
