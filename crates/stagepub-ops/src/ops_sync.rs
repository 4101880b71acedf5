//! Operation: mirror released `maven-metadata.xml` files into the stage.
//!
//! Publishing overwrites the remote artifact-level metadata with whatever is
//! staged locally, so the stage must start from the released version list.

use stagepub_core::config::ReleaseConfig;
use stagepub_maven::download::{self, MetadataFetch};
use stagepub_maven::metadata::released_versions;
use stagepub_maven::repository::{MavenRepository, METADATA_FILE};
use stagepub_util::errors::StagepubError;
use stagepub_util::fs::{dir_has_entries, ensure_dir, remove_file_if_exists};
use stagepub_util::progress::{spinner, status, status_info, status_warn};

/// What happened to one artifact's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The version directory already has content, so the stage wins.
    Skipped,
    /// Metadata was downloaded. `already_released` is set when it lists the
    /// version being released.
    Saved { already_released: bool },
    /// Never released; any stale local copy was removed.
    NotReleased,
}

/// Fetch metadata for every configured artifact, in order.
pub async fn sync_metadata(config: &ReleaseConfig) -> miette::Result<Vec<(String, SyncOutcome)>> {
    let artifacts = config.require_artifacts()?;
    let source = MavenRepository::metadata_source(config);
    let client = download::build_client(&config.http)?;
    let group_dir = config.group_dir();

    let mut outcomes = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let artifact_dir = group_dir.join(artifact);
        ensure_dir(&artifact_dir).map_err(StagepubError::Io)?;
        let saved = artifact_dir.join(METADATA_FILE);

        if dir_has_entries(&artifact_dir.join(&config.version)).map_err(StagepubError::Io)? {
            status_info(
                "Skipped",
                &format!("{artifact} because it was published to stage"),
            );
            outcomes.push((artifact.clone(), SyncOutcome::Skipped));
            continue;
        }

        status("Syncing", artifact);
        let url = source.metadata_url(&config.group, artifact);
        let sp = spinner(&format!("Fetching {url}"));
        let fetched = download::fetch_metadata(&client, &url).await;
        sp.finish_and_clear();

        let outcome = match fetched? {
            MetadataFetch::Found(bytes) => {
                std::fs::write(&saved, &bytes).map_err(StagepubError::Io)?;
                let already_released = released_version_listed(&bytes, &config.version);
                if already_released {
                    status_warn(
                        "Warning",
                        &format!("{artifact} {} is already released", config.version),
                    );
                }
                SyncOutcome::Saved { already_released }
            }
            MetadataFetch::NotFound => {
                tracing::info!("{artifact} has no released metadata");
                remove_file_if_exists(&saved).map_err(StagepubError::Io)?;
                SyncOutcome::NotReleased
            }
        };
        outcomes.push((artifact.clone(), outcome));
    }
    Ok(outcomes)
}

fn released_version_listed(bytes: &[u8], version: &str) -> bool {
    match released_versions(bytes) {
        Ok(versions) => versions.iter().any(|v| v == version),
        Err(e) => {
            tracing::warn!("Could not parse downloaded metadata: {e}");
            false
        }
    }
}
