//! The two shapes a digest provider can take, and one way to drive both.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::oneshot;

use crate::{DigestError, HexDigest, Result};

/// A digest that is computed inline and returned directly.
pub trait SyncDigest: Send + Sync {
    fn digest(&self, content: &[u8]) -> HexDigest;
}

/// A digest that is computed elsewhere and reported through a completion.
///
/// Implementations must eventually call [`DigestCompletion::complete`] or drop
/// the completion; dropping it is observed as [`DigestError::Abandoned`].
pub trait CallbackDigest: Send + Sync {
    fn digest(&self, content: Bytes, on_complete: DigestCompletion);
}

/// One-shot completion handle handed to a [`CallbackDigest`].
#[derive(Debug)]
pub struct DigestCompletion {
    tx: oneshot::Sender<HexDigest>,
}

impl DigestCompletion {
    fn channel() -> (Self, oneshot::Receiver<HexDigest>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Report the finished digest. The handle is consumed, so it fires at most once.
    pub fn complete(self, digest: HexDigest) {
        // The waiting side may already be gone; nothing is left to notify then.
        let _ = self.tx.send(digest);
    }
}

/// A digest provider of either shape.
///
/// Callers only use [`DigestProvider::compute`], so synchronous and
/// callback-based providers go through the same code path.
#[derive(Clone)]
pub enum DigestProvider {
    Sync(Arc<dyn SyncDigest>),
    Callback(Arc<dyn CallbackDigest>),
}

impl DigestProvider {
    pub fn sync(digest: impl SyncDigest + 'static) -> Self { Self::Sync(Arc::new(digest)) }

    pub fn callback(digest: impl CallbackDigest + 'static) -> Self {
        Self::Callback(Arc::new(digest))
    }

    /// Compute the digest of `content`, awaiting the completion if the
    /// provider is callback-based.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Abandoned`] when a callback provider drops its
    /// completion without reporting a digest.
    pub async fn compute(&self, content: Bytes) -> Result<HexDigest> {
        match self {
            Self::Sync(digest) => Ok(digest.digest(&content)),
            Self::Callback(digest) => {
                let (completion, rx) = DigestCompletion::channel();
                digest.digest(content, completion);
                rx.await.map_err(|_| DigestError::Abandoned)
            }
        }
    }
}

impl fmt::Debug for DigestProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("DigestProvider::Sync(..)"),
            Self::Callback(_) => f.write_str("DigestProvider::Callback(..)"),
        }
    }
}

#[cfg(feature = "sha256")]
impl Default for DigestProvider {
    fn default() -> Self { Self::sync(crate::Sha256) }
}
