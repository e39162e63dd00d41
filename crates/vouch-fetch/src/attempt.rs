//! One fetch attempt against one source.

use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::debug;

use crate::error::AttemptError;
use crate::transport::Transport;

/// Bookkeeping for a single in-flight attempt.
#[derive(Debug, Clone)]
struct Attempt {
    source:  String,
    started: Instant,
    timeout: Option<Duration>,
}

impl Attempt {
    fn start(source: &str, timeout: Option<Duration>) -> Self {
        Self {
            source: source.to_string(),
            started: Instant::now(),
            timeout,
        }
    }

    fn source(&self) -> &str { &self.source }

    fn timeout(&self) -> Option<Duration> { self.timeout }

    fn elapsed(&self) -> Duration { self.started.elapsed() }
}

/// Runs attempts over a [`Transport`], enforcing an optional deadline.
#[derive(Debug, Clone, Default)]
pub struct AttemptController<T> {
    transport: T,
}

impl<T: Transport> AttemptController<T> {
    pub fn new(transport: T) -> Self { Self { transport } }

    pub fn transport(&self) -> &T { &self.transport }

    /// Fetch `source`, giving up after `timeout` if one is set.
    ///
    /// The deadline is released on every exit path. A fetch that misses its
    /// deadline is dropped, so its response can never be acted upon.
    ///
    /// # Errors
    ///
    /// Returns [`AttemptError::Timeout`] when the deadline passes first and
    /// [`AttemptError::Transport`] for transport or status failures.
    pub async fn run(&self, source: &str, timeout: Option<Duration>) -> Result<Bytes, AttemptError> {
        let attempt = Attempt::start(source, timeout);
        debug!(source, timeout = ?attempt.timeout(), "starting attempt");

        let fetch = self.transport.fetch(source);
        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result.map_err(AttemptError::from),
                Err(_) => Err(AttemptError::Timeout(limit)),
            },
            None => fetch.await.map_err(AttemptError::from),
        };

        match &outcome {
            Ok(content) => debug!(
                source = attempt.source(),
                bytes = content.len(),
                elapsed = ?attempt.elapsed(),
                "attempt succeeded"
            ),
            Err(err) => debug!(
                source = attempt.source(),
                error = %err,
                elapsed = ?attempt.elapsed(),
                "attempt failed"
            ),
        }
        outcome
    }
}
