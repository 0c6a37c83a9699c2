//! Error taxonomy for a harvest run: configuration, upstream API, persistence.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Coarse class of a [`ScrapeError`], used by callers that only care about
/// which unit of work a failure ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Upstream,
    Persistence,
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Bad options or missing credentials. Raised before any request is made.
    #[error("configuration error: {0}")]
    Config(String),

    /// Non-success status from the API.
    #[error("{context}: {status} {reason}")]
    Status {
        context: String,
        status: u16,
        reason: String,
    },

    /// Transport failure or a payload that did not decode.
    #[error("{context}: {source}")]
    Upstream {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// Stored record could not be read, decoded, or written.
    #[error("persistence error at {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl ScrapeError {
    pub fn config(msg: impl Into<String>) -> Self {
        ScrapeError::Config(msg.into())
    }

    pub fn upstream(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        ScrapeError::Upstream { context: context.into(), source: source.into() }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        ScrapeError::Persistence { path: path.into(), source: source.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::Config(_) => ErrorKind::Configuration,
            ScrapeError::Status { .. } | ScrapeError::Upstream { .. } => ErrorKind::Upstream,
            ScrapeError::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}
