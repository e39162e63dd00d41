//! Adapter for transports that report through callbacks.
//!
//! Callback-driven transports may raise more than one signal for the same
//! request, e.g. an error event followed by a completion event with a failing
//! status. An attempt settles on the first signal only; everything after that
//! is ignored, so one attempt can never cause two fallbacks.

use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::transport::Transport;

type Slot = Arc<Mutex<Option<oneshot::Sender<Result<Bytes>>>>>;

/// Settles one attempt. Cloning shares the same attempt.
#[derive(Debug, Clone)]
pub struct AttemptSignal {
    slot: Slot,
}

impl AttemptSignal {
    fn channel() -> (Self, oneshot::Receiver<Result<Bytes>>) {
        let (tx, rx) = oneshot::channel();
        (Self { slot: Arc::new(Mutex::new(Some(tx))) }, rx)
    }

    /// Settle with the fetched content. Returns `false` if already settled.
    pub fn complete(&self, content: impl Into<Bytes>) -> bool { self.settle(Ok(content.into())) }

    /// Settle with a transport failure. Returns `false` if already settled.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.settle(Err(TransportError::Transport(reason.into())))
    }

    /// Settle with a non-success status. Returns `false` if already settled.
    pub fn status(&self, code: u16) -> bool { self.settle(Err(TransportError::Status(code))) }

    pub fn is_settled(&self) -> bool { self.lock().is_none() }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<Result<Bytes>>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(&self, outcome: Result<Bytes>) -> bool {
        let Some(tx) = self.lock().take() else {
            debug!("ignoring signal for an attempt that already settled");
            return false;
        };
        // The attempt may have timed out already; a late result is dropped.
        let _ = tx.send(outcome);
        true
    }
}

/// A transport that starts a request and reports back through an [`AttemptSignal`].
pub trait SignalTransport: Send + Sync {
    fn start(&self, source: &str, signal: AttemptSignal);
}

/// Turns a [`SignalTransport`] into a [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct Signalled<T>(pub T);

impl<T: SignalTransport> Transport for Signalled<T> {
    async fn fetch(&self, source: &str) -> Result<Bytes> {
        let (signal, rx) = AttemptSignal::channel();
        self.0.start(source, signal);
        rx.await.unwrap_or_else(|_| {
            Err(TransportError::Transport(format!(
                "{source}: transport dropped the request without signalling"
            )))
        })
    }
}
