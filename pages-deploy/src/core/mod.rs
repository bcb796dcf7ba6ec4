//! Deterministic, pure logic shared by the deploy orchestration.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod commit_message;
pub mod targets;
pub mod types;
