//! Maven repository abstraction: URL layout and file roles.

use std::path::{Component, Path};

use stagepub_core::config::ReleaseConfig;

/// Artifact-level version listing kept next to the version directories.
pub const METADATA_FILE: &str = "maven-metadata.xml";

/// Suffix of detached ASCII-armored signatures.
pub const SIGNATURE_SUFFIX: &str = ".asc";

/// Suffixes of checksum sidecars.
pub const CHECKSUM_SUFFIXES: [&str; 2] = [".sha1", ".md5"];

/// A remote Maven repository identified by its base URL.
#[derive(Debug, Clone)]
pub struct MavenRepository {
    pub name: String,
    pub url: String,
}

impl MavenRepository {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// The repository released versions are looked up in.
    pub fn metadata_source(config: &ReleaseConfig) -> Self {
        Self::new("metadata", &config.repositories.metadata)
    }

    /// The staging repository uploads go to.
    pub fn staging(config: &ReleaseConfig) -> Self {
        Self::new("staging", &config.repositories.staging)
    }

    /// Standard Maven layout path for a given coordinate.
    ///
    /// `net.mamoe:mirai-core:2.12.0` becomes `net/mamoe/mirai-core/2.12.0`
    pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> String {
        format!("{}/{}/{}", group.replace('.', "/"), artifact, version)
    }

    /// URL to the `maven-metadata.xml` at the artifact level (version listing).
    pub fn metadata_url(&self, group: &str, artifact: &str) -> String {
        format!(
            "{}/{}/{}/{METADATA_FILE}",
            self.url,
            group.replace('.', "/"),
            artifact
        )
    }

    /// URL for a path relative to the repository root, always `/`-separated.
    pub fn file_url(&self, relative: &Path) -> String {
        let mut url = self.url.clone();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                url.push('/');
                url.push_str(&part.to_string_lossy());
            }
        }
        url
    }
}

/// What a file in the staging tree is, judged by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// A built artifact: jar, pom, module, klib, ...
    Artifact,
    /// `maven-metadata.xml`; uploaded and checksummed but never signed.
    Metadata,
    /// A generated `.asc` signature.
    Signature,
    /// A generated `.sha1` or `.md5` checksum.
    Checksum,
}

impl FileRole {
    pub fn of(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if CHECKSUM_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            FileRole::Checksum
        } else if name.ends_with(SIGNATURE_SUFFIX) {
            FileRole::Signature
        } else if name == METADATA_FILE {
            FileRole::Metadata
        } else {
            FileRole::Artifact
        }
    }

    /// Generated files that are produced fresh on every run.
    pub fn is_generated(self) -> bool {
        matches!(self, FileRole::Signature | FileRole::Checksum)
    }

    pub fn is_signable(self) -> bool {
        self == FileRole::Artifact
    }
}
