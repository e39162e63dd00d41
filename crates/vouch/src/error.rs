//! Error types for vouch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeedError {
    /// Every source failed or was rejected and the list did not end with a
    /// stop marker. The only failure a caller of [`Engine::need`](crate::Engine::need)
    /// ever observes from the fallback chain.
    #[error("no source for digest {}", expected.as_deref().unwrap_or("<none>"))]
    SourcesExhausted { expected: Option<String> },

    /// A blocking call could not start its runtime.
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NeedError>;
