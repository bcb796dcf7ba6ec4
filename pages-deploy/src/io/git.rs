//! Git adapter for deploy commands.
//!
//! Deploys only read from git directly; committing and pushing the output
//! folder is the import helper's job.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::io::process::run_checked;

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Resolve `rev` to an object id. Returns raw stdout, trailing newline included.
    #[instrument(skip_all, fields(rev))]
    pub fn rev_parse(&self, rev: &str) -> Result<String> {
        let out = self.run_capture(&["rev-parse", rev])?;
        debug!(revision = %out.trim(), "resolved revision");
        Ok(out)
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        let output = run_checked(cmd)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
