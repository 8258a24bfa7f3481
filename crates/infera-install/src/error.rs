use std::io;
use std::path::PathBuf;

use reqwest::{StatusCode, Url};

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("download of {uri} rejected with HTTP status {status}")]
    DownloadRejected { uri: Url, status: StatusCode },

    #[error("download of {uri} failed: {source}")]
    DownloadFailed { uri: Url, source: reqwest::Error },

    #[error("blocked suspicious archive entry '{entry}': resolves to '{resolved}'")]
    PathTraversal { entry: PathBuf, resolved: PathBuf },

    #[error("failed to extract '{path}': {source}")]
    Extraction { path: PathBuf, source: io::Error },

    #[error("cannot replace existing path '{path}' with symlink: {source}")]
    DegradedExtraction { path: PathBuf, source: io::Error },

    #[error("archive did not contain the expected executable at '{path}'")]
    MissingExecutable { path: PathBuf },

    #[error("failed to remove temporary directory '{dir}': {source}")]
    Cleanup {
        dir: PathBuf,
        #[source]
        source: io::Error,
        /// The failure that was already in flight when cleanup ran, if any.
        primary: Option<Box<InstallError>>,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InstallError {
    /// The error that cleanup reporting wrapped, when both the install and
    /// the cleanup failed.
    pub fn primary(&self) -> Option<&InstallError> {
        match self {
            Self::Cleanup { primary, .. } => primary.as_deref(),
            _ => None,
        }
    }

    /// True for the degraded-but-recoverable class of failures, which leave
    /// a best-effort extraction behind rather than nothing at all.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::DegradedExtraction { .. })
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
