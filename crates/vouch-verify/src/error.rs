use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// The provider dropped its completion handle without producing a digest.
    #[error("digest provider abandoned the computation")]
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid SHA256 digest: {0}")]
pub struct ParseDigestError(pub String);

pub type Result<T> = std::result::Result<T, DigestError>;
