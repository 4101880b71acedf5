//! HTTP client construction and `maven-metadata.xml` retrieval.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use stagepub_core::config::HttpConfig;
use stagepub_util::errors::StagepubError;

/// Outcome of a conditional metadata fetch.
#[derive(Debug)]
pub enum MetadataFetch {
    /// 200: the raw document.
    Found(Vec<u8>),
    /// 404: the artifact has never been released.
    NotFound,
}

/// Build the shared reqwest client used for metadata and uploads.
pub fn build_client(http: &HttpConfig) -> miette::Result<Client> {
    let mut builder = Client::builder().user_agent(http.user_agent.clone());
    if let Some(secs) = http.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| {
        StagepubError::Network {
            message: format!("Failed to create HTTP client: {e}"),
        }
        .into()
    })
}

/// `GET` an artifact-level `maven-metadata.xml`.
///
/// 200 and 404 are expected answers; any other status is an error carrying
/// the response body.
pub async fn fetch_metadata(client: &Client, url: &str) -> miette::Result<MetadataFetch> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| StagepubError::Network {
            message: format!("Request to {url} failed: {e}"),
        })?;

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(MetadataFetch::NotFound);
    }

    let bytes = resp.bytes().await.map_err(|e| StagepubError::Network {
        message: format!("Failed to read response from {url}: {e}"),
    })?;

    if status != StatusCode::OK {
        return Err(StagepubError::Network {
            message: format!(
                "HTTP {status} fetching {url} -> {}",
                String::from_utf8_lossy(&bytes)
            ),
        }
        .into());
    }

    Ok(MetadataFetch::Found(bytes.to_vec()))
}
