use std::time::Duration;

use vouch_deliver::Consumer;

use crate::source::SourceList;
use crate::verify::ExpectedDigest;

/// One top-level call: which sources, which digest, what to do with the result.
///
/// The three constructors mirror the supported call shapes. The consumer is
/// fixed here and never re-inspected while sources are being tried.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) sources:  SourceList,
    pub(crate) expected: Option<ExpectedDigest>,
    pub(crate) consumer: Consumer,
    pub(crate) timeout:  Option<Duration>,
}

impl Request {
    /// `(sources, digest)`: verify and deliver with no consumer.
    pub fn new(sources: impl Into<SourceList>, expected: impl Into<ExpectedDigest>) -> Self {
        Self {
            sources:  sources.into(),
            expected: Some(expected.into()),
            consumer: Consumer::Noop,
            timeout:  None,
        }
    }

    /// `(consumer, sources, digest)`.
    pub fn with_consumer(
        consumer: impl Into<Consumer>,
        sources: impl Into<SourceList>,
        expected: impl Into<ExpectedDigest>,
    ) -> Self {
        Self::new(sources, expected).consumer(consumer)
    }

    /// `(sources)` without a digest: the first source that loads is accepted
    /// and its digest is logged so it can be pinned.
    ///
    /// Meant for bootstrapping a digest, not for production use.
    pub fn diagnostic(sources: impl Into<SourceList>) -> Self {
        Self {
            sources:  sources.into(),
            expected: None,
            consumer: Consumer::Noop,
            timeout:  None,
        }
    }

    #[must_use]
    pub fn consumer(mut self, consumer: impl Into<Consumer>) -> Self {
        self.consumer = consumer.into();
        self
    }

    /// Override the per-attempt timeout for this call only.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn sources(&self) -> &SourceList { &self.sources }

    pub fn expected(&self) -> Option<&ExpectedDigest> { self.expected.as_ref() }

    pub fn is_diagnostic(&self) -> bool { self.expected.is_none() }
}
