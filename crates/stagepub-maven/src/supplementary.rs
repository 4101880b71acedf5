//! Signature and checksum generation for the pending set.
//!
//! Two passes, each over a snapshot of the set taken when the pass starts:
//!
//! 1. sign every artifact (everything but `maven-metadata.xml`);
//! 2. write `.sha1` and `.md5` for every file, signatures included.
//!
//! Files produced by a pass are appended only after it finishes, and
//! checksum files are never checksummed themselves.

use std::path::PathBuf;

use stagepub_util::errors::StagepubError;
use stagepub_util::hash::write_checksum_files;
use stagepub_util::progress;

use crate::pending::PendingSet;
use crate::repository::FileRole;
use crate::signer::Signer;

/// Counts from one [`generate`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Files in the set before generation.
    pub discovered: usize,
    /// Signatures produced.
    pub signed: usize,
    /// Files that received a `.sha1`/`.md5` pair.
    pub digested: usize,
}

impl GenerationSummary {
    /// Size the pending set must have after generation.
    pub fn expected_total(&self) -> usize {
        self.discovered + self.signed + 2 * self.digested
    }
}

/// Sign, then checksum, every file in `pending`, appending the results.
pub fn generate(
    pending: &mut PendingSet,
    signer: &mut dyn Signer,
) -> miette::Result<GenerationSummary> {
    let discovered = pending.len();

    let signatures = sign_pass(&pending.snapshot(), signer)?;
    let signed = signatures.len();
    pending.extend(signatures);

    let checksums = digest_pass(&pending.snapshot())?;
    let digested = checksums.len() / 2;
    pending.extend(checksums);

    Ok(GenerationSummary {
        discovered,
        signed,
        digested,
    })
}

fn sign_pass(snapshot: &[PathBuf], signer: &mut dyn Signer) -> miette::Result<Vec<PathBuf>> {
    if !signer.ensure_ready()? {
        progress::status_info("Skipped", "signing is not configured");
        return Ok(Vec::new());
    }

    let _group = progress::group("Signing artifacts");
    let mut produced = Vec::new();
    for file in snapshot {
        if !FileRole::of(file).is_signable() {
            continue;
        }
        progress::status("Signing", &file.display().to_string());
        if let Some(signature) = signer.sign(file)? {
            produced.push(signature);
        }
    }
    Ok(produced)
}

fn digest_pass(snapshot: &[PathBuf]) -> miette::Result<Vec<PathBuf>> {
    let _group = progress::group("Computing checksums");
    let mut produced = Vec::with_capacity(snapshot.len() * 2);
    for file in snapshot {
        if FileRole::of(file) == FileRole::Checksum {
            continue;
        }
        let sidecars = write_checksum_files(file).map_err(|e| StagepubError::Generic {
            message: format!("Failed to checksum {}: {e}", file.display()),
        })?;
        produced.extend(sidecars);
    }
    Ok(produced)
}
