//! Deploy a static-site build to a hosted pages branch.
//!
//! A deploy builds the site, deletes output files the build no longer
//! produces, and publishes the output folder as a commit on the deploy branch
//! with `ghp-import`. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (target listing, output comparison,
//!   commit messages, outcomes). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting adapters (config, git, process execution) behind
//!   the [`io::build::BuildRunner`], [`io::scanner::OutputScanner`] and
//!   [`io::publisher::VcsPublisher`] traits.
//!
//! [`deploy`] sequences the adapters and reports through [`events`].

pub mod core;
pub mod deploy;
pub mod events;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
