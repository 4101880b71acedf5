//! Operations behind each `stagepub` command.
//!
//! Every operation takes a resolved [`ReleaseConfig`](stagepub_core::config::ReleaseConfig)
//! and drives the Maven subsystem; none of them read the environment.

pub mod ops_merge;
pub mod ops_publish;
pub mod ops_sync;
