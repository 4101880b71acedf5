//! CLI argument definitions.
//!
//! Release coordinates are global so a CI job can export them once and share
//! them between commands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use stagepub_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "stagepub",
    version,
    about = "Sign, checksum and upload a locally staged Maven release",
    long_about = "stagepub publishes a release staged in a local Maven repository layout. \
                  It mirrors already released metadata, merges per-job staging trees and \
                  uploads every file with detached signatures and checksums."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Configuration file, relative to the working directory
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Release coordinates shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ReleaseArgs {
    /// Version being released
    #[arg(long, global = true, env = "PROJ_VERSION")]
    pub release_version: Option<String>,

    /// Artifact ids, separated by `|`
    #[arg(long, global = true, env = "PROJ_ARTIFACTS", value_delimiter = '|')]
    pub artifacts: Vec<String>,

    /// Local staging repository (path or `file:` URI)
    #[arg(long, global = true, env = "PROJ_STAGE_REPO")]
    pub stage_repo: Option<String>,

    /// Maven group id
    #[arg(long, global = true, env = "PROJ_GROUP")]
    pub group: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download released maven-metadata.xml files into the stage
    SyncMavenMetadata,

    /// Merge per-job staging repositories into the stage
    MergeRepos {
        /// Repository to merge; a single directory of `publish-stage-*` repositories is expanded
        #[arg(long = "repo", value_name = "PATH")]
        repos: Vec<PathBuf>,
    },

    /// Sign, checksum and upload the stage
    #[command(alias = "publish-to-maven-central")]
    Publish {
        /// Staging repository user
        #[arg(long, env = "CERT_USERNAME")]
        username: Option<String>,

        /// Staging repository password
        #[arg(long, env = "CERT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
