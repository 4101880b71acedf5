//! Staging repository authentication.
//!
//! The staging host expects a preemptive `Authorization: Basic ...` header on
//! every upload. The header value is computed once per run from the
//! credentials in [`ReleaseConfig`](stagepub_core::config::ReleaseConfig).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

use stagepub_core::config::Credentials;
use stagepub_util::errors::StagepubError;

/// `Basic <base64(user:pass)>`
pub fn basic_authorization(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.username, credentials.password);
    format!("Basic {}", STANDARD.encode(raw))
}

/// Header value for [`basic_authorization`], marked sensitive so it never shows up in logs.
pub fn authorization_header(credentials: &Credentials) -> miette::Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&basic_authorization(credentials)).map_err(|e| {
        StagepubError::Config {
            message: format!("Credentials cannot be sent as an HTTP header: {e}"),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Apply a precomputed authorization header to a request.
pub fn apply_auth(request: RequestBuilder, authorization: &HeaderValue) -> RequestBuilder {
    request.header(AUTHORIZATION, authorization.clone())
}
