//! Error types for vouch-deliver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure inside the execution environment.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source:  io::Error,
    },

    #[error("`{program}` exited with status {code:?}")]
    Exit { program: String, code: Option<i32> },

    #[error("failed to place content at {}: {source}", path.display())]
    Place {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("execution rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Why verified content was not delivered.
#[derive(Debug, Error)]
pub enum DeliverError {
    /// The consumer's filter vetoed the content. Nothing was executed.
    #[error("filter rejected the content")]
    FilterRejected,

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

pub type Result<T> = std::result::Result<T, DeliverError>;
