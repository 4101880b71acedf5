//! Core types for stagepub.
//!
//! This crate defines the release configuration every stagepub operation
//! receives: version, artifact list, staging repository root, group id,
//! credentials, remote endpoints, and signing setup.
//!
//! This crate is intentionally free of async code and network I/O, and never
//! reads the process environment; the CLI gathers inputs and hands them in.

pub mod config;
