//! Error types for style recommendation operations
//!
//! Local precondition failures (missing image, bad configuration) surface
//! before any request is built. Everything else happened on the network
//! stage and is delivered through the same result channel as success.

use std::path::PathBuf;
use thiserror::Error;

use crate::inflight::RequestKey;

/// Errors that can occur while talking to the prediction service
#[derive(Error, Debug)]
pub enum StyleError {
    /// The image file to upload does not exist
    #[error("image file not found: {}", path.display())]
    MissingImage {
        /// Path the caller supplied
        path: PathBuf,
    },

    /// The image file exists but could not be read
    #[error("failed to read image {}: {source}", path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No response reached us (connect, DNS, TLS, timeout, body read)
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("server rejected request (status {status}): {body}")]
    ServerRejected {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The server answered 2xx but the body could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A configured base URL could not be parsed
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The same operation is already outstanding for this id
    #[error("request already in flight: {0}")]
    AlreadyInFlight(RequestKey),
}

impl From<serde_json::Error> for StyleError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

impl StyleError {
    /// HTTP status for server rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerRejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the failure happened before anything was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingImage { .. }
                | Self::UnreadableImage { .. }
                | Self::InvalidUrl { .. }
                | Self::AlreadyInFlight(_)
        )
    }
}

/// Result type alias for style operations
pub type StyleResult<T> = Result<T, StyleError>;
