use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The API key is missing or a configuration override could not be parsed.
    #[error("{0}")]
    Configuration(String),
    /// A local media file does not exist.
    #[error("media file not found: {}", .0.display())]
    AssetNotFound(PathBuf),
    /// The input is valid but not accepted by this operation, e.g. a local video path.
    #[error("{0}")]
    UnsupportedInput(String),
    /// The remote service answered with an error status or an error payload.
    #[error("remote service error (status {status}): {message}")]
    RemoteService { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure happened on the remote side of the call (an error
    /// status, an error payload, or the transport itself).
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteService { .. } | Error::Http(_))
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedInput(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
