//! VCS publisher adapter for `ghp-import`.
//!
//! The [`VcsPublisher`] trait decouples deploy orchestration from git and the
//! import helper. Tests use scripted publishers that record calls without
//! spawning processes.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::io::git::Git;
use crate::io::process::{exit_code, run_captured, run_inherited};

/// What to publish and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Commit message for the deploy commit.
    pub message: String,
    /// Remote to push to.
    pub remote: String,
    /// Branch to commit the output folder onto.
    pub branch: String,
    /// Directory whose contents become the branch tree, relative to the site root.
    pub output_folder: PathBuf,
}

/// Abstraction over the version-control side of a deploy.
pub trait VcsPublisher {
    /// Name of the import helper, for error reports.
    fn helper(&self) -> &str;

    /// True if the import helper can be run.
    fn is_available(&self) -> bool;

    /// Raw revision identifier of `branch` (as printed by the VCS).
    fn source_revision(&self, branch: &str) -> Result<String>;

    /// The exact command line [`VcsPublisher::publish`] runs for `request`.
    fn command_line(&self, request: &PublishRequest) -> Vec<String>;

    /// Commit and push the output folder. Returns the helper's exit code.
    fn publish(&self, request: &PublishRequest) -> Result<i32>;
}

/// Publisher backed by `git` and `ghp-import`.
#[derive(Debug, Clone)]
pub struct GhpImportPublisher {
    git: Git,
    helper: String,
}

impl GhpImportPublisher {
    pub fn new(workdir: impl Into<PathBuf>, helper: impl Into<String>) -> Self {
        Self {
            git: Git::new(workdir),
            helper: helper.into(),
        }
    }
}

impl VcsPublisher for GhpImportPublisher {
    fn helper(&self) -> &str {
        &self.helper
    }

    #[instrument(skip_all, fields(helper = %self.helper))]
    fn is_available(&self) -> bool {
        let mut cmd = Command::new(&self.helper);
        cmd.arg("-h").current_dir(self.git.workdir());
        match run_captured(cmd) {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                debug!(exit_code = ?output.status.code(), "helper -h exited non-zero");
                false
            }
            Err(err) => {
                debug!(err = %format!("{err:#}"), "helper could not be spawned");
                false
            }
        }
    }

    fn source_revision(&self, branch: &str) -> Result<String> {
        self.git
            .rev_parse(branch)
            .with_context(|| format!("resolve source branch {branch}"))
    }

    fn command_line(&self, request: &PublishRequest) -> Vec<String> {
        vec![
            self.helper.clone(),
            "-n".to_string(),
            "-m".to_string(),
            request.message.clone(),
            "-p".to_string(),
            "-r".to_string(),
            request.remote.clone(),
            "-b".to_string(),
            request.branch.clone(),
            request.output_folder.to_string_lossy().into_owned(),
        ]
    }

    #[instrument(skip_all, fields(remote = %request.remote, branch = %request.branch))]
    fn publish(&self, request: &PublishRequest) -> Result<i32> {
        let mut cmd = Command::new(&self.helper);
        cmd.args(["-n", "-m", request.message.as_str(), "-p", "-r"])
            .arg(&request.remote)
            .arg("-b")
            .arg(&request.branch)
            .arg(&request.output_folder)
            .current_dir(self.git.workdir());
        let status = run_inherited(cmd).context("run import helper")?;
        Ok(exit_code(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PublishRequest {
        PublishRequest {
            message: "msg".to_string(),
            remote: "origin".to_string(),
            branch: "gh-pages".to_string(),
            output_folder: PathBuf::from("output"),
        }
    }

    #[test]
    fn command_line_matches_helper_contract() {
        let temp = tempfile::tempdir().expect("tempdir");
        let publisher = GhpImportPublisher::new(temp.path(), "ghp-import");
        assert_eq!(
            publisher.command_line(&request()),
            vec![
                "ghp-import",
                "-n",
                "-m",
                "msg",
                "-p",
                "-r",
                "origin",
                "-b",
                "gh-pages",
                "output"
            ]
        );
    }

    #[test]
    fn missing_helper_is_unavailable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let publisher = GhpImportPublisher::new(temp.path(), "pages-deploy-test-no-such-helper");
        assert!(!publisher.is_available());
    }

    #[test]
    fn publish_with_missing_helper_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let publisher = GhpImportPublisher::new(temp.path(), "pages-deploy-test-no-such-helper");
        assert!(publisher.publish(&request()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn publish_passes_arguments_and_returns_exit_code() {
        use crate::test_support::write_fake_helper;

        let temp = tempfile::tempdir().expect("tempdir");
        let helper = write_fake_helper(temp.path(), 3).expect("helper");
        let publisher = GhpImportPublisher::new(temp.path(), helper.to_string_lossy());
        assert!(publisher.is_available());

        let code = publisher.publish(&request()).expect("publish");
        assert_eq!(code, 3);
        let recorded = crate::test_support::read_helper_args(temp.path()).expect("args");
        assert_eq!(recorded, publisher.command_line(&request())[1..].to_vec());
    }
}
