//! Stable exit codes for pages-deploy commands.
//!
//! Build and publish failures exit with the failing tool's own code instead.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid configuration, a tool could not be spawned, or another unexpected error.
pub const INVALID: i32 = 1;
/// The import helper is not installed.
pub const MISSING_DEPENDENCY: i32 = 5;
/// At least one stale output file could not be removed.
pub const CLEANUP_FAILED: i32 = 6;
