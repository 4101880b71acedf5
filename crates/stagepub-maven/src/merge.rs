//! Merging independently staged repository trees into the stage root.
//!
//! CI jobs each publish to their own local repository (`publish-stage-*`).
//! Before uploading, every artifact that has content for the release version
//! is copied into a single tree with the same relative layout.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use stagepub_util::errors::StagepubError;
use stagepub_util::fs::{collect_files, dir_has_entries, ensure_dir};
use stagepub_util::progress;

use crate::repository::METADATA_FILE;

/// Directory name prefix of per-job staging repositories.
pub const STAGE_DIR_PREFIX: &str = "publish-stage-";

/// Resolve the list of repositories to merge.
///
/// A single path that does not itself contain `group_path` is treated as a
/// directory of `publish-stage-*` repositories.
pub fn expand_repos(repos: Vec<PathBuf>, group_path: &str) -> miette::Result<Vec<PathBuf>> {
    if repos.len() != 1 || repos[0].join(group_path).is_dir() {
        return Ok(repos);
    }

    let parent = &repos[0];
    let mut expanded: Vec<PathBuf> = std::fs::read_dir(parent)
        .map_err(|e| StagepubError::Generic {
            message: format!("Cannot list {}: {e}", parent.display()),
        })?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(STAGE_DIR_PREFIX))
        })
        .collect();
    expanded.sort();
    Ok(expanded)
}

/// Artifact directories in `repo` that have a `maven-metadata.xml` and a
/// non-empty `<version>` subdirectory.
pub fn versioned_artifact_dirs(repo: &Path, version: &str) -> miette::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(repo, &mut files).map_err(StagepubError::Io)?;

    let mut dirs = BTreeSet::new();
    for file in files {
        if file.file_name() != Some(OsStr::new(METADATA_FILE)) {
            continue;
        }
        let Some(parent) = file.parent() else {
            continue;
        };
        if dir_has_entries(&parent.join(version)).map_err(StagepubError::Io)? {
            dirs.insert(parent.to_path_buf());
        }
    }
    Ok(dirs.into_iter().collect())
}

/// Copy every versioned artifact from `repos` into `stage_root`, overwriting
/// existing files. Returns the number of files copied.
pub fn merge_repos(repos: &[PathBuf], stage_root: &Path, version: &str) -> miette::Result<usize> {
    let mut copied = 0;
    for repo in repos {
        tracing::info!("Merging {}", repo.display());
        for artifact_dir in versioned_artifact_dirs(repo, version)? {
            let mut files = Vec::new();
            collect_files(&artifact_dir, &mut files).map_err(StagepubError::Io)?;
            files.sort();

            for source in files {
                let rel = source.strip_prefix(repo).map_err(|e| StagepubError::Generic {
                    message: format!("{} escapes {}: {e}", source.display(), repo.display()),
                })?;
                let target = stage_root.join(rel);
                if target == source {
                    continue;
                }
                if let Some(parent) = target.parent() {
                    ensure_dir(parent).map_err(StagepubError::Io)?;
                }
                progress::status(
                    "Copying",
                    &format!("{} to {}", source.display(), target.display()),
                );
                std::fs::copy(&source, &target).map_err(|e| StagepubError::Generic {
                    message: format!(
                        "Failed to copy {} to {}: {e}",
                        source.display(),
                        target.display()
                    ),
                })?;
                copied += 1;
            }
        }
    }
    Ok(copied)
}
