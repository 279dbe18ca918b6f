use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Broad class of a per-page failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    ContentType,
    Io,
    Parse,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: Url, status: reqwest::StatusCode },

    #[error("wrong content-type: {content_type}")]
    ContentType { url: Url, content_type: String },

    #[error("failed to write {} for {url}: {source}", .path.display())]
    Io {
        url: Url,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid url {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

impl SnapshotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SnapshotError::Request { .. } | SnapshotError::Status { .. } => ErrorKind::Fetch,
            SnapshotError::ContentType { .. } => ErrorKind::ContentType,
            SnapshotError::Io { .. } => ErrorKind::Io,
            SnapshotError::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// The page the failure belongs to, if it got as far as a parsed URL
    pub fn url(&self) -> Option<&Url> {
        match self {
            SnapshotError::Request { url, .. }
            | SnapshotError::Status { url, .. }
            | SnapshotError::ContentType { url, .. }
            | SnapshotError::Io { url, .. } => Some(url),
            SnapshotError::Parse { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
