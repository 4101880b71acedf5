use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all stagepub operations.
#[derive(Debug, Error, Diagnostic)]
pub enum StagepubError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required setting is missing or malformed.
    #[error("Configuration error: {message}")]
    #[diagnostic(help(
        "Set PROJ_VERSION, PROJ_ARTIFACTS, PROJ_STAGE_REPO and PROJ_GROUP (or the matching flags); \
         publishing also needs CERT_USERNAME and CERT_PASSWORD"
    ))]
    Config { message: String },

    /// Network request failed or returned an unexpected status.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The external signing tool could not be set up or failed on a file.
    #[error("Signing failed: {message}")]
    #[diagnostic(help("Check the signing workspace and that the signing program is on PATH"))]
    Signing { message: String },

    /// One or more uploads were rejected. `report` lists every failure.
    #[error("{count} upload(s) failed:\n{report}")]
    Upload { count: usize, report: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
