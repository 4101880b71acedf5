//! Operation: sign, checksum and upload the staged release.
//!
//! Stages run strictly in order: discover, sign, digest, upload. Anything that
//! fails before upload aborts immediately; upload failures are gathered and
//! reported together once every file was attempted.

use stagepub_core::config::ReleaseConfig;
use stagepub_maven::download;
use stagepub_maven::pending;
use stagepub_maven::publish::Uploader;
use stagepub_maven::repository::MavenRepository;
use stagepub_maven::signer::{self, Signer};
use stagepub_maven::supplementary::{self, GenerationSummary};

/// Counts from a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub generation: GenerationSummary,
    pub uploaded: usize,
}

/// Publish with the signer chosen from the configuration.
pub async fn publish(config: &ReleaseConfig) -> miette::Result<PublishSummary> {
    let mut signer = signer::select(&config.signing);
    publish_with(config, signer.as_mut()).await
}

/// Publish using the given signer.
pub async fn publish_with(
    config: &ReleaseConfig,
    signer: &mut dyn Signer,
) -> miette::Result<PublishSummary> {
    let credentials = config.require_credentials()?;
    let group_dir = config.group_dir();

    tracing::info!("Discovering files under {}", group_dir.display());
    let mut pending = pending::discover(&group_dir, &config.version)?;

    let generation = supplementary::generate(&mut pending, signer)?;
    tracing::info!(
        "{} discovered, {} signed, {} checksummed, {} queued",
        generation.discovered,
        generation.signed,
        generation.digested,
        pending.len()
    );

    let client = download::build_client(&config.http)?;
    let uploader = Uploader::new(client, MavenRepository::staging(config), credentials)?;
    let report = uploader.publish(&config.stage_root, pending).await;
    let uploaded = report.into_result()?;

    Ok(PublishSummary {
        generation,
        uploaded,
    })
}
