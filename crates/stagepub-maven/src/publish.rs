//! Uploading the pending set to a staging repository.
//!
//! Every file is `PUT` to `<staging url>/<path relative to the stage root>`.
//! A rejected upload is recorded and the batch continues; the caller turns a
//! non-empty [`FailureReport`] into one error after every file was attempted.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::header::{HeaderValue, CONTENT_LENGTH};
use reqwest::{Body, Client};

use stagepub_core::config::Credentials;
use stagepub_util::errors::StagepubError;
use stagepub_util::progress;

use crate::auth;
use crate::pending::PendingSet;
use crate::repository::MavenRepository;

/// A single rejected upload.
#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub file: PathBuf,
    pub uri: String,
    /// `None` when no response was received at all.
    pub status: Option<u16>,
    pub body: String,
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "PUT {} ({}) -> HTTP {status}: {}",
                self.uri,
                self.file.display(),
                self.body
            ),
            None => write!(f, "PUT {} ({}) -> {}", self.uri, self.file.display(), self.body),
        }
    }
}

/// Outcome of one upload.
#[derive(Debug, Clone)]
pub enum UploadResult {
    Uploaded { uri: String, status: u16 },
    Failed(UploadFailure),
}

/// Failures collected over a whole batch, in upload order.
#[derive(Debug, Clone, Default)]
pub struct FailureReport {
    attempted: usize,
    failures: Vec<UploadFailure>,
}

impl FailureReport {
    pub fn record(&mut self, result: UploadResult) {
        self.attempted += 1;
        if let UploadResult::Failed(failure) = result {
            self.failures.push(failure);
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn failures(&self) -> &[UploadFailure] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failures, separated by blank lines.
    pub fn render(&self) -> String {
        self.failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// `Ok(uploaded count)` when nothing failed, otherwise a single error
    /// listing every failure.
    pub fn into_result(self) -> miette::Result<usize> {
        if self.failures.is_empty() {
            return Ok(self.attempted);
        }
        Err(StagepubError::Upload {
            count: self.failures.len(),
            report: self.render(),
        }
        .into())
    }
}

/// Authenticated uploader for one staging repository.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    repository: MavenRepository,
    authorization: HeaderValue,
}

impl Uploader {
    pub fn new(
        client: Client,
        repository: MavenRepository,
        credentials: &Credentials,
    ) -> miette::Result<Self> {
        Ok(Self {
            client,
            repository,
            authorization: auth::authorization_header(credentials)?,
        })
    }

    /// Remote URI for a file under `root`.
    pub fn target_uri(&self, root: &Path, file: &Path) -> Option<String> {
        file.strip_prefix(root)
            .ok()
            .map(|rel| self.repository.file_url(rel))
    }

    /// Upload one file. Never fails; problems are reported in the result.
    pub async fn upload_one(&self, root: &Path, file: &Path) -> UploadResult {
        let Some(uri) = self.target_uri(root, file) else {
            return UploadResult::Failed(UploadFailure {
                file: file.to_path_buf(),
                uri: String::new(),
                status: None,
                body: format!("not inside the stage root {}", root.display()),
            });
        };
        let failed = |status: Option<u16>, body: String| {
            UploadResult::Failed(UploadFailure {
                file: file.to_path_buf(),
                uri: uri.clone(),
                status,
                body,
            })
        };

        let (body, len) = match open_body(file).await {
            Ok(opened) => opened,
            Err(e) => return failed(None, format!("cannot read file: {e}")),
        };

        let request = auth::apply_auth(self.client.put(&uri), &self.authorization)
            .header(CONTENT_LENGTH, len)
            .body(body);
        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => return failed(None, format!("request failed: {e}")),
        };

        let status = resp.status();
        if status.is_success() {
            return UploadResult::Uploaded {
                uri: uri.clone(),
                status: status.as_u16(),
            };
        }
        let body = resp
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
        failed(Some(status.as_u16()), body)
    }

    /// Upload the whole set in sorted order, collecting every failure.
    pub async fn publish(&self, root: &Path, pending: PendingSet) -> FailureReport {
        let files = pending.into_sorted(root);
        let _group = progress::group(&format!("Publishing to {}", self.repository.url));

        let mut report = FailureReport::default();
        for file in &files {
            let result = self.upload_one(root, file).await;
            match &result {
                UploadResult::Uploaded { uri, status } => {
                    tracing::debug!("{uri} -> {status}");
                    progress::status("Uploaded", uri);
                }
                UploadResult::Failed(failure) => {
                    progress::status_error("Failed", &failure.to_string());
                }
            }
            report.record(result);
        }
        report
    }
}

/// Stream `file` as a request body without reading it into memory.
async fn open_body(file: &Path) -> std::io::Result<(Body, u64)> {
    let handle = tokio::fs::File::open(file).await?;
    let len = handle.metadata().await?.len();
    Ok((Body::from(handle), len))
}
