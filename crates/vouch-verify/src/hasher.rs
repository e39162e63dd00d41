use std::sync::Arc;

use bytes::Bytes;

use crate::{CallbackDigest, DigestCompletion, HexDigest, SyncDigest};

#[cfg(feature = "sha256")]
use sha2::Digest as _;

/// SHA-256 over the raw bytes, no text re-encoding.
#[cfg(feature = "sha256")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

#[cfg(feature = "sha256")]
impl SyncDigest for Sha256 {
    fn digest(&self, content: &[u8]) -> HexDigest { HexDigest::from_bytes(sha2::Sha256::digest(content)) }
}

#[cfg(feature = "blake3")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

#[cfg(feature = "blake3")]
impl SyncDigest for Blake3 {
    fn digest(&self, content: &[u8]) -> HexDigest { HexDigest::from_bytes(blake3::hash(content).as_bytes()) }
}

/// Runs a synchronous digest on tokio's blocking pool and reports it through
/// the completion, so hashing never stalls the calling task.
///
/// Must be driven from within a tokio runtime.
#[derive(Debug)]
pub struct Offloaded<D> {
    inner: Arc<D>,
}

impl<D> Offloaded<D> {
    pub fn new(inner: D) -> Self { Self { inner: Arc::new(inner) } }
}

impl<D> Clone for Offloaded<D> {
    fn clone(&self) -> Self { Self { inner: Arc::clone(&self.inner) } }
}

impl<D: SyncDigest + 'static> CallbackDigest for Offloaded<D> {
    fn digest(&self, content: Bytes, on_complete: DigestCompletion) {
        let inner = Arc::clone(&self.inner);
        // A panicking digest drops the completion, which surfaces as Abandoned.
        tokio::task::spawn_blocking(move || on_complete.complete(inner.digest(&content)));
    }
}
