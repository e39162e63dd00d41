//! Error types for vouch-fetch.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Why a transport could not produce content for a source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid source: {0}")]
    InvalidSource(String),
}

/// How a single attempt failed. Every variant is recoverable by trying the
/// next source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
}

impl AttemptError {
    pub fn is_timeout(&self) -> bool { matches!(self, Self::Timeout(_)) }

    /// The HTTP status code, when the failure was a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(TransportError::Status(code)) => Some(*code),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self { TransportError::Transport(e.to_string()) }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => TransportError::Status(status.as_u16()),
            None if e.is_builder() => TransportError::InvalidSource(e.to_string()),
            None => TransportError::Transport(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
