//! Command dispatch and handler modules.

mod merge;
mod publish;
mod sync;

use std::path::Path;

use miette::Result;

use stagepub_core::config::{FileConfig, ReleaseConfig, ReleaseInputs};
use stagepub_util::errors::StagepubError;

use crate::cli::{Cli, Command, ReleaseArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::SyncMavenMetadata => sync::exec(&cli.release, &cli.config),
        Command::MergeRepos { repos } => merge::exec(&cli.release, &cli.config, repos),
        Command::Publish { username, password } => {
            publish::exec(&cli.release, &cli.config, username, password)
        }
    }
}

/// Resolve the run configuration against the current directory.
fn resolve_config(
    release: &ReleaseArgs,
    config_file: &Path,
    username: Option<String>,
    password: Option<String>,
) -> Result<ReleaseConfig> {
    let cwd = std::env::current_dir().map_err(StagepubError::Io)?;
    let file = FileConfig::load(&cwd.join(config_file))?;
    let inputs = ReleaseInputs {
        version: release.release_version.clone(),
        artifacts: release.artifacts.clone(),
        stage_repo: release.stage_repo.clone(),
        group: release.group.clone(),
        username,
        password,
    };
    let config = ReleaseConfig::resolve(inputs, file, &cwd)?;
    tracing::debug!("Resolved configuration: {config:?}");
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        StagepubError::Generic {
            message: format!("Failed to start async runtime: {e}"),
        }
        .into()
    })
}
