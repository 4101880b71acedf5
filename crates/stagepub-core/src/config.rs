use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use stagepub_util::errors::StagepubError;

/// Name of the optional configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stagepub.toml";

/// Where released versions are looked up (`maven-metadata.xml`).
pub const DEFAULT_METADATA_URL: &str = "https://repo1.maven.org/maven2";

/// Sonatype OSSRH staging deploy endpoint.
pub const DEFAULT_STAGING_URL: &str =
    "https://oss.sonatype.org/service/local/staging/deploy/maven2";

/// User agent sent with every upload. Some staging hosts reject unknown clients.
pub const DEFAULT_USER_AGENT: &str =
    "Gradle/7.3.1 (Windows 10;10.0;amd64) (Azul Systems, Inc.;18.0.2.1;18.0.2.1+1)";

/// Settings read from `stagepub.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Maven group id, e.g. `net.mamoe`.
    #[serde(default)]
    pub group: Option<String>,

    #[serde(default)]
    pub repositories: RepositoriesConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Remote endpoints from `[repositories]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoriesConfig {
    #[serde(default = "default_metadata_url")]
    pub metadata: String,
    #[serde(default = "default_staging_url")]
    pub staging: String,
}

impl Default for RepositoriesConfig {
    fn default() -> Self {
        Self {
            metadata: default_metadata_url(),
            staging: default_staging_url(),
        }
    }
}

fn default_metadata_url() -> String {
    DEFAULT_METADATA_URL.to_string()
}

fn default_staging_url() -> String {
    DEFAULT_STAGING_URL.to_string()
}

/// External signer setup from `[signing]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Directory holding `keys.gpg`, `keys.gpg.pub` and the private `homedir`.
    /// Signing is skipped when it does not exist.
    #[serde(default = "default_signing_workspace")]
    pub workspace: PathBuf,
    #[serde(default = "default_signing_program")]
    pub program: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            workspace: default_signing_workspace(),
            program: default_signing_program(),
        }
    }
}

fn default_signing_workspace() -> PathBuf {
    PathBuf::from("build-gpg-sign")
}

fn default_signing_program() -> String {
    "gpg".to_string()
}

/// HTTP client settings from `[http]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,
    /// Per-request timeout. Unset means requests may block indefinitely.
    #[serde(default, rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl FileConfig {
    /// Load `path`, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| StagepubError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content).map_err(|e| {
            StagepubError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Username/password pair for the staging repository.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Raw inputs collected from flags and environment variables by the CLI.
#[derive(Debug, Clone, Default)]
pub struct ReleaseInputs {
    pub version: Option<String>,
    pub artifacts: Vec<String>,
    pub stage_repo: Option<String>,
    pub group: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Fully resolved configuration for one run, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub version: String,
    pub artifacts: Vec<String>,
    /// Root of the local staging repository (the directory that contains the group path).
    pub stage_root: PathBuf,
    pub group: String,
    pub credentials: Option<Credentials>,
    pub repositories: RepositoriesConfig,
    pub signing: SigningConfig,
    pub http: HttpConfig,
}

impl ReleaseConfig {
    /// Combine CLI/env inputs with the configuration file. Inputs win.
    ///
    /// Relative paths (stage repository, signing workspace) are resolved
    /// against `base_dir`.
    pub fn resolve(
        inputs: ReleaseInputs,
        file: FileConfig,
        base_dir: &Path,
    ) -> miette::Result<Self> {
        let version = non_empty(inputs.version)
            .ok_or_else(|| missing("release version", "PROJ_VERSION"))?;
        let stage_repo = non_empty(inputs.stage_repo)
            .ok_or_else(|| missing("staging repository", "PROJ_STAGE_REPO"))?;
        let group = non_empty(inputs.group)
            .or(non_empty(file.group))
            .ok_or_else(|| missing("group id", "PROJ_GROUP"))?;

        let stage_root = absolutize(&resolve_stage_root(&stage_repo)?, base_dir);

        let artifacts: Vec<String> = inputs
            .artifacts
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        let credentials = match (non_empty(inputs.username), non_empty(inputs.password)) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        let mut signing = file.signing;
        signing.workspace = absolutize(&signing.workspace, base_dir);

        let mut repositories = file.repositories;
        repositories.metadata = repositories.metadata.trim_end_matches('/').to_string();
        repositories.staging = repositories.staging.trim_end_matches('/').to_string();

        Ok(Self {
            version,
            artifacts,
            stage_root,
            group,
            credentials,
            repositories,
            signing,
            http: file.http,
        })
    }

    /// Group id as a path: `net.mamoe` becomes `net/mamoe`.
    pub fn group_path(&self) -> String {
        self.group.replace('.', "/")
    }

    /// Local directory holding one subdirectory per artifact.
    pub fn group_dir(&self) -> PathBuf {
        self.group
            .split('.')
            .fold(self.stage_root.clone(), |dir, part| dir.join(part))
    }

    /// The artifact list, which must not be empty.
    pub fn require_artifacts(&self) -> miette::Result<&[String]> {
        if self.artifacts.is_empty() {
            return Err(missing("artifact list", "PROJ_ARTIFACTS").into());
        }
        Ok(&self.artifacts)
    }

    /// Staging credentials, required for publishing.
    pub fn require_credentials(&self) -> miette::Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            StagepubError::Config {
                message: "staging credentials are not set (CERT_USERNAME / CERT_PASSWORD)"
                    .to_string(),
            }
            .into()
        })
    }
}

/// Turn a `file:` URI or plain path into a filesystem path.
pub fn resolve_stage_root(location: &str) -> miette::Result<PathBuf> {
    if location.starts_with("file:") {
        let url = url::Url::parse(location).map_err(|e| StagepubError::Config {
            message: format!("Invalid staging repository URI '{location}': {e}"),
        })?;
        return url.to_file_path().map_err(|()| {
            StagepubError::Config {
                message: format!("Staging repository URI '{location}' is not a local path"),
            }
            .into()
        });
    }
    Ok(PathBuf::from(location))
}

fn absolutize(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(what: &str, var: &str) -> StagepubError {
    StagepubError::Config {
        message: format!("{what} is not set ({var})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            username: "deployer".to_string(),
            password: "hunter2".to_string(),
        };
        let text = format!("{creds:?}");
        assert!(text.contains("deployer"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn non_empty_filters_blank() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("1.0".to_string())), Some("1.0".to_string()));
    }
}
