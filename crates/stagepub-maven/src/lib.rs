//! Maven repository protocol: repository layout, `maven-metadata.xml`,
//! detached signing, checksum sidecars, staging upload, and merging of
//! staged repository trees.
//!
//! The publish pipeline is [`pending::discover`] →
//! [`supplementary::generate`] → [`publish::Uploader::publish`].

pub mod auth;
pub mod download;
pub mod merge;
pub mod metadata;
pub mod pending;
pub mod publish;
pub mod repository;
pub mod signer;
pub mod supplementary;
