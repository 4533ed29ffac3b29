use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Every way a download job can fail. No variant is retried; the first
/// failure is terminal for the job invocation.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("range request for chunk {index} not honored, got status {status}")]
    RangeNotHonored { index: usize, status: StatusCode },

    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("partial download failed: {0}")]
    PartialDownload(#[source] Box<FetchError>),

    #[error("assembling {path}: {source}")]
    Assembly {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("chunk download cancelled")]
    Cancelled,

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// True for the cooperative-cancellation marker raised when a worker
    /// observes another worker's failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
