//! Shared utilities for stagepub.
//!
//! This crate provides cross-cutting concerns used by all other stagepub crates:
//! error types, filesystem helpers, content digests, process spawning,
//! and terminal status output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod process;
pub mod progress;
