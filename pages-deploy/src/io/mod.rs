//! I/O adapters for deploy commands.

pub mod build;
pub mod config;
pub mod git;
pub mod process;
pub mod publisher;
pub mod scanner;
