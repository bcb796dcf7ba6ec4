//! Commit message for the deploy branch.

/// Name recorded in deploy commits.
pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
/// Version recorded in deploy commits.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the deploy commit message.
///
/// `revision` is the raw `git rev-parse` output; surrounding whitespace is
/// dropped and a newline separates it from the version line, so the result
/// matches what earlier deploys wrote for the usual newline-terminated output.
pub fn commit_message(tool: &str, version: &str, revision: &str) -> String {
    format!(
        "{tool} auto commit.\n\nSource commit: {}\n{tool} version: {version}",
        revision.trim()
    )
}
