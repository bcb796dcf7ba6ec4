//! Orchestration for `pages-deploy github-deploy`.
//!
//! A deploy is a fixed sequence: check the import helper, build the site,
//! delete stale output files, then commit and push the output folder to the
//! deploy branch. Every detected failure ends the run immediately; nothing is
//! retried or rolled back.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::commit_message::{TOOL_NAME, TOOL_VERSION, commit_message};
use crate::core::types::{DeployOutcome, RemovalFailure};
use crate::events::{DeployEvent, EventSink};
use crate::io::build::BuildRunner;
use crate::io::config::DeployConfig;
use crate::io::publisher::{PublishRequest, VcsPublisher};
use crate::io::scanner::OutputScanner;

/// Sequences one deploy run over its collaborators.
pub struct Deployer<'a, B, S, P> {
    root: &'a Path,
    config: &'a DeployConfig,
    builder: &'a B,
    scanner: &'a S,
    publisher: &'a P,
    events: &'a dyn EventSink,
}

impl<'a, B: BuildRunner, S: OutputScanner, P: VcsPublisher> Deployer<'a, B, S, P> {
    pub fn new(
        root: &'a Path,
        config: &'a DeployConfig,
        builder: &'a B,
        scanner: &'a S,
        publisher: &'a P,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            root,
            config,
            builder,
            scanner,
            publisher,
            events,
        }
    }

    /// Run the deploy.
    ///
    /// Expected failures (missing helper, failed build, failed cleanup, failed
    /// push) are returned as a [`DeployOutcome`]; `Err` means a tool could not
    /// be run at all or git could not resolve the source branch.
    #[instrument(skip_all, fields(root = %self.root.display(), branch = %self.config.deploy_branch))]
    pub fn execute(&self) -> Result<DeployOutcome> {
        if !self.publisher.is_available() {
            let helper = self.publisher.helper().to_string();
            self.events.on_event(DeployEvent::DependencyMissing {
                helper: helper.clone(),
            });
            return Ok(DeployOutcome::MissingDependency { helper });
        }

        if self.config.pull_before_commit {
            self.events.on_event(DeployEvent::PullIgnored);
        }

        let code = self.builder.build().context("build site")?;
        if code != 0 {
            self.events.on_event(DeployEvent::BuildFailed { code });
            return Ok(DeployOutcome::BuildFailed { code });
        }

        let failures = self.remove_stale_files()?;
        if !failures.is_empty() {
            return Ok(DeployOutcome::CleanupFailed { failures });
        }

        self.commit_and_push()
    }

    /// Delete every stale file, collecting failures instead of stopping at the first.
    fn remove_stale_files(&self) -> Result<Vec<RemovalFailure>> {
        let report = self
            .scanner
            .scan(&self.config.output_folder)
            .context("scan output folder")?;
        for path in report.missing {
            self.events.on_event(DeployEvent::ExpectedMissing { path });
        }

        let mut failures = Vec::new();
        for path in report.stale {
            match fs::remove_file(self.root.join(&path)) {
                Ok(()) => self.events.on_event(DeployEvent::StaleRemoved { path }),
                // Already gone is as good as removed.
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    self.events.on_event(DeployEvent::StaleRemoved { path });
                }
                Err(err) => {
                    let error = err.to_string();
                    self.events.on_event(DeployEvent::StaleRemoveFailed {
                        path: path.clone(),
                        error: error.clone(),
                    });
                    failures.push(RemovalFailure { path, error });
                }
            }
        }
        debug!(failed = failures.len(), "stale file cleanup finished");
        Ok(failures)
    }

    fn commit_and_push(&self) -> Result<DeployOutcome> {
        let revision = self
            .publisher
            .source_revision(&self.config.source_branch)?;
        let request = self.publish_request(commit_message(TOOL_NAME, TOOL_VERSION, &revision));

        let command = self.publisher.command_line(&request);
        self.events.on_event(DeployEvent::Publishing {
            command: command.clone(),
        });
        let code = self.publisher.publish(&request)?;
        if code != 0 {
            self.events.on_event(DeployEvent::PublishFailed {
                command: command.clone(),
                code,
            });
            return Ok(DeployOutcome::PublishFailed { command, code });
        }

        self.events.on_event(DeployEvent::Published {
            remote: request.remote,
            branch: request.branch,
        });
        Ok(DeployOutcome::Published)
    }

    fn publish_request(&self, message: String) -> PublishRequest {
        PublishRequest {
            message,
            remote: self.config.remote_name.clone(),
            branch: self.config.deploy_branch.clone(),
            output_folder: self.config.output_folder.clone(),
        }
    }
}
