use bytes::{Bytes, BytesMut};
use tracing::{debug, info};

use crate::error::{DeliverError, Result};
use crate::{Consumer, Executor, Payload, Target};

/// Separator between content and an appended literal.
pub const TRAILER_SEPARATOR: &[u8] = b"\n;";

/// Record of a completed delivery, handed to completion callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The content as delivered, after filtering, without any appended literal.
    pub content:         Bytes,
    /// `None` when the source was trusted and no digest was computed.
    pub actual_digest:   Option<String>,
    pub expected_digest: Option<String>,
    pub target:          Target,
}

/// Applies a [`Consumer`] to verified content and hands it to an [`Executor`].
#[derive(Debug, Clone, Default)]
pub struct Deliverer<E> {
    executor: E,
}

impl<E: Executor> Deliverer<E> {
    pub fn new(executor: E) -> Self { Self { executor } }

    pub fn executor(&self) -> &E { &self.executor }

    /// Filter, compose, execute, then run the completion callback.
    ///
    /// # Errors
    ///
    /// - [`DeliverError::FilterRejected`] if the filter returns `None`; the
    ///   executor is not invoked.
    /// - [`DeliverError::Execution`] if the executor fails; callbacks are not run.
    pub async fn deliver(
        &self,
        content: Bytes,
        consumer: &Consumer,
        actual_digest: Option<&str>,
        expected_digest: Option<&str>,
    ) -> Result<Delivery> {
        let content = match consumer.filter() {
            Some(filter) => {
                filter(&content, actual_digest, expected_digest).ok_or(DeliverError::FilterRejected)?
            }
            None => content,
        };

        let target = consumer.target();
        let payload = Payload {
            content:    compose(&content, consumer.trailer()),
            execute_as: consumer.execute_as().map(str::to_string),
            target:     target.clone(),
        };
        debug!(bytes = payload.content.len(), target = ?payload.target, "delivering content");
        self.executor.execute(payload).await?;

        let delivery = Delivery {
            content,
            actual_digest: actual_digest.map(str::to_string),
            expected_digest: expected_digest.map(str::to_string),
            target,
        };
        if let Some(on_delivered) = consumer.on_delivered() {
            on_delivered(&delivery);
        }
        info!(bytes = delivery.content.len(), "content delivered");
        Ok(delivery)
    }
}

/// Append `trailer` to `content`, separated by [`TRAILER_SEPARATOR`].
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use vouch_deliver::compose;
///
/// let content = Bytes::from_static(b"var x = 1");
/// assert_eq!(&compose(&content, Some("init(x)"))[..], b"var x = 1\n;init(x)");
/// assert_eq!(compose(&content, None), content);
/// ```
pub fn compose(content: &Bytes, trailer: Option<&str>) -> Bytes {
    let Some(trailer) = trailer else {
        return content.clone();
    };
    let mut buf = BytesMut::with_capacity(content.len() + TRAILER_SEPARATOR.len() + trailer.len());
    buf.extend_from_slice(content);
    buf.extend_from_slice(TRAILER_SEPARATOR);
    buf.extend_from_slice(trailer.as_bytes());
    buf.freeze()
}
