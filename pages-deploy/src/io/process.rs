//! Helpers for running the external tools a deploy shells out to.

use std::path::Path;
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument};

use crate::exit_codes;

/// Build a [`Command`] from an argv array, running in `workdir`.
pub fn command_from_argv(argv: &[String], workdir: &Path) -> Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("empty command"))?;
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(workdir);
    Ok(cmd)
}

/// Run a command with inherited stdout/stderr so the operator sees its output.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_inherited(mut cmd: Command) -> Result<ExitStatus> {
    debug!("spawning child process");
    cmd.stdin(Stdio::null());
    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).with_context(|| format!("spawn {}", describe(&cmd)));
        }
    };
    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}

/// Run a command and capture stdout/stderr.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_captured(mut cmd: Command) -> Result<Output> {
    debug!("spawning child process");
    cmd.stdin(Stdio::null());
    let output = cmd
        .output()
        .with_context(|| format!("spawn {}", describe(&cmd)))?;
    debug!(exit_code = ?output.status.code(), "command finished");
    Ok(output)
}

/// Run a command, capture its output, and fail unless it exits successfully.
pub fn run_checked(cmd: Command) -> Result<Output> {
    let label = describe(&cmd);
    let output = run_captured(cmd)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "{label} failed with status {:?}: {}",
            output.status.code(),
            stderr.trim()
        ));
    }
    Ok(output)
}

/// Exit code for a finished process. Termination by signal maps to [`exit_codes::INVALID`].
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(exit_codes::INVALID)
}

/// Render a command as `program arg1 arg2` for error messages.
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    parts.join(" ")
}
