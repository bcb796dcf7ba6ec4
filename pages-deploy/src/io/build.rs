//! Build runner adapter for the site generator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::io::process::{command_from_argv, describe, exit_code, run_inherited};

/// Abstraction over the site build pipeline.
pub trait BuildRunner {
    /// Build the site and return the build's exit code (`0` on success).
    fn build(&self) -> Result<i32>;
}

/// Build runner that spawns a configured command (default `nikola build`).
#[derive(Debug, Clone)]
pub struct CommandBuildRunner {
    workdir: PathBuf,
    argv: Vec<String>,
}

impl CommandBuildRunner {
    pub fn new(workdir: impl Into<PathBuf>, argv: Vec<String>) -> Self {
        Self {
            workdir: workdir.into(),
            argv,
        }
    }
}

impl BuildRunner for CommandBuildRunner {
    #[instrument(skip_all)]
    fn build(&self) -> Result<i32> {
        let cmd = command_from_argv(&self.argv, &self.workdir).context("build command")?;
        info!(command = %describe(&cmd), "building site");
        let status = run_inherited(cmd).context("run build")?;
        let code = exit_code(status);
        debug!(code, "build finished");
        Ok(code)
    }
}
