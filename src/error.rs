//! Error types shared by the report engine and the renderer.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for report generation.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Failures while loading fonts and images at process start.
///
/// These are fatal: the process must not start serving report requests with an
/// incomplete asset set.
#[derive(Error, Debug)]
pub enum AssetError {
    /// A required font or image file does not exist.
    #[error("required asset missing: {}", path.display())]
    Missing { path: PathBuf },

    /// A required file exists but could not be read.
    #[error("failed to read asset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// None of the candidate asset directories holds the complete asset set.
    #[error("unable to locate asset directory; checked: {0}")]
    Unresolved(String),
}

/// Errors that can occur while generating a report document.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Asset loading failed.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// The PDF backend rejected the document.
    #[error("failed to render document: {0}")]
    Render(String),

    /// The render step exceeded the configured deadline.
    #[error("document rendering exceeded the deadline of {after:?}")]
    Timeout { after: Duration },

    /// The blocking render task panicked or was cancelled.
    #[error("render task did not complete: {0}")]
    Join(String),

    /// Configuration or request JSON could not be parsed.
    #[error("invalid JSON: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<genpdf::error::Error> for ReportError {
    fn from(err: genpdf::error::Error) -> Self {
        ReportError::Render(err.to_string())
    }
}
