//! Client errors

use thiserror::Error;

/// Errors from backend and report requests.
///
/// Fetch failures deliberately carry only the resource name in their message.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Failed to fetch {resource}")]
    Transport {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {resource}")]
    Status { resource: &'static str, status: u16 },

    #[error("Failed to fetch {resource}")]
    Decode {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server refused the request with an explanation
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport { source, .. } | ClientError::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
