use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::Result;

/// Retrieves the raw bytes behind a source identifier.
///
/// Implementations must hand back the body exactly as received: no charset
/// decoding, no newline normalisation. Digests are computed over these bytes
/// and compared against digests published for the original file.
///
/// # Implementations
///
/// - [`ReqwestTransport`](crate::ReqwestTransport): HTTP(S) via `reqwest`
/// - [`FileTransport`](crate::FileTransport): local files and `file://` URLs
/// - [`Signalled`](crate::Signalled): adapts callback-style transports
pub trait Transport: Send + Sync {
    /// Fetch the complete content for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`](crate::TransportError::Status) for a
    /// non-success HTTP status and
    /// [`TransportError::Transport`](crate::TransportError::Transport) for
    /// connection or I/O failures.
    fn fetch(&self, source: &str) -> impl Future<Output = Result<Bytes>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn fetch(&self, source: &str) -> impl Future<Output = Result<Bytes>> + Send { (**self).fetch(source) }
}
