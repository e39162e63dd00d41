//! Local sources: plain paths and `file://` URLs.

use std::path::PathBuf;

use bytes::Bytes;

use crate::error::{Result, TransportError};
use crate::transport::Transport;

const FILE_SCHEME: &str = "file://";

/// Returns `true` if `source` names a local file rather than a remote URL.
///
/// # Examples
///
/// ```
/// use vouch_fetch::is_local;
///
/// assert!(is_local("file:///srv/mirror/lib.js"));
/// assert!(is_local("/srv/mirror/lib.js"));
/// assert!(is_local("./vendor/lib.js"));
/// assert!(!is_local("https://cdn.example.com/lib.js"));
/// ```
pub fn is_local(source: &str) -> bool {
    source.starts_with(FILE_SCHEME)
        || source.starts_with('/')
        || source.starts_with("./")
        || source.starts_with("../")
}

fn local_path(source: &str) -> Result<PathBuf> {
    let path = source.strip_prefix(FILE_SCHEME).unwrap_or(source);
    if path.is_empty() {
        return Err(TransportError::InvalidSource(source.to_string()));
    }
    Ok(PathBuf::from(path))
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl Transport for FileTransport {
    async fn fetch(&self, source: &str) -> Result<Bytes> {
        let path = local_path(source)?;
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| TransportError::Transport(format!("{}: {e}", path.display())))?;
        Ok(Bytes::from(content))
    }
}

/// Sends local sources to one transport and everything else to another.
#[derive(Debug, Clone, Default)]
pub struct RoutedTransport<R, L = FileTransport> {
    remote: R,
    local:  L,
}

impl<R, L> RoutedTransport<R, L> {
    pub fn new(remote: R, local: L) -> Self { Self { remote, local } }
}

impl<R: Transport, L: Transport> Transport for RoutedTransport<R, L> {
    async fn fetch(&self, source: &str) -> Result<Bytes> {
        if is_local(source) {
            self.local.fetch(source).await
        } else {
            self.remote.fetch(source).await
        }
    }
}
