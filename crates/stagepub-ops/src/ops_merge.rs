//! Operation: merge per-job staging repositories into the stage root.

use std::path::PathBuf;

use stagepub_core::config::ReleaseConfig;
use stagepub_maven::merge;
use stagepub_util::errors::StagepubError;

/// Merge `repos` (or the `publish-stage-*` directories of a single parent)
/// into the configured stage root. Returns the number of files copied.
pub fn merge_repos(config: &ReleaseConfig, repos: Vec<PathBuf>) -> miette::Result<usize> {
    if repos.is_empty() {
        return Err(StagepubError::Config {
            message: "no repositories to merge (pass --repo)".to_string(),
        }
        .into());
    }
    let repos = merge::expand_repos(repos, &config.group_path())?;
    tracing::info!("Merging {} repositories", repos.len());
    merge::merge_repos(&repos, &config.stage_root, &config.version)
}
