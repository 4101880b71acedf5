//! The set of files queued for upload.
//!
//! Discovery builds the initial set from the staging tree; signing and
//! checksumming append to it; upload consumes it in a fixed order. Nothing is
//! ever removed and no path appears twice.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use stagepub_util::errors::StagepubError;
use stagepub_util::fs::{collect_files, dir_has_entries};

use crate::repository::FileRole;

/// Append-only, duplicate-free list of files to upload.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    files: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` unless it is already queued. Returns whether it was added.
    pub fn push(&mut self, path: PathBuf) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.files.push(path);
        true
    }

    /// Append every path produced by a pass, in order.
    pub fn extend(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            self.push(path);
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Copy of the current contents; a pass iterates this while the set grows.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.files.clone()
    }

    /// Freeze the set into upload order: lexicographic by the `/`-separated
    /// path relative to `root`.
    pub fn into_sorted(self, root: &Path) -> Vec<PathBuf> {
        let mut keyed: Vec<(String, PathBuf)> = self
            .files
            .into_iter()
            .map(|p| (relative_key(root, &p), p))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, p)| p).collect()
    }
}

fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Delete every artifact directory under `group_dir` whose `<version>`
/// subdirectory is missing or empty. Returns the removed directories.
pub fn prune_unversioned(group_dir: &Path, version: &str) -> miette::Result<Vec<PathBuf>> {
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(group_dir)
        .map_err(StagepubError::Io)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();

    let mut removed = Vec::new();
    for subdir in subdirs {
        let version_dir = subdir.join(version);
        if dir_has_entries(&version_dir).map_err(StagepubError::Io)? {
            continue;
        }
        tracing::info!(
            "Pruning {}: nothing staged for {version}",
            subdir.display()
        );
        std::fs::remove_dir_all(&subdir).map_err(StagepubError::Io)?;
        removed.push(subdir);
    }
    Ok(removed)
}

/// Prune unversioned artifacts, then collect every staged file under
/// `group_dir` except previously generated signatures and checksums.
pub fn discover(group_dir: &Path, version: &str) -> miette::Result<PendingSet> {
    if !group_dir.is_dir() {
        return Err(StagepubError::Generic {
            message: format!("No staged artifacts: {} does not exist", group_dir.display()),
        }
        .into());
    }

    prune_unversioned(group_dir, version)?;

    let mut files = Vec::new();
    collect_files(group_dir, &mut files).map_err(StagepubError::Io)?;

    let mut pending = PendingSet::new();
    for file in files {
        if FileRole::of(&file).is_generated() {
            tracing::debug!("Ignoring generated file {}", file.display());
            continue;
        }
        pending.push(file);
    }
    tracing::debug!("Discovered {} file(s) under {}", pending.len(), group_dir.display());
    Ok(pending)
}
