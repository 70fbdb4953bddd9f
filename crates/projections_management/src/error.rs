//! Management client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagementError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: reqwest::Method,
        url: String,
        status: u16,
        body: String,
    },

    #[error("invalid response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build request to {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl ManagementError {
    /// Failures without a server answer are worth retrying, answers are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { .. } | Self::Decode { .. } | Self::Request { .. } | Self::Client(_) => {
                false
            }
        }
    }
}

pub type ManagementResult<T> = Result<T, ManagementError>;
