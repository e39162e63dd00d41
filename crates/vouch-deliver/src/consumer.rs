//! What the caller wants done with verified content.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;

use crate::Delivery;

/// Invoked after content has been executed successfully.
pub type OnDelivered = Arc<dyn Fn(&Delivery) + Send + Sync>;

/// Sees `(content, actual_digest, expected_digest)` before execution.
///
/// Returning `None` vetoes the content; returning `Some` replaces it.
pub type Filter = Arc<dyn Fn(&Bytes, Option<&str>, Option<&str>) -> Option<Bytes> + Send + Sync>;

/// Where delivered content goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    /// Run the content with an interpreter.
    #[default]
    Execute,
    /// Place the content at a path.
    File(PathBuf),
    /// Verify only; nothing is executed or written.
    Discard,
}

/// Follow-up attached to a structured consumer.
#[derive(Clone)]
pub enum Completion {
    Callback(OnDelivered),
    /// Appended to the content and executed along with it.
    Literal(String),
}

impl Completion {
    pub fn callback(f: impl Fn(&Delivery) + Send + Sync + 'static) -> Self { Self::Callback(Arc::new(f)) }

    pub fn literal(literal: impl Into<String>) -> Self { Self::Literal(literal.into()) }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Completion::Callback(..)"),
            Self::Literal(literal) => f.debug_tuple("Completion::Literal").field(literal).finish(),
        }
    }
}

/// Options of a structured consumer.
#[derive(Clone, Default)]
pub struct ConsumerOptions {
    /// Interpreter to execute the content with.
    pub execute_as:  Option<String>,
    pub target:      Option<Target>,
    pub filter:      Option<Filter>,
    pub on_complete: Option<Completion>,
}

impl ConsumerOptions {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn execute_as(mut self, interpreter: impl Into<String>) -> Self {
        self.execute_as = Some(interpreter.into());
        self
    }

    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn filter(
        mut self,
        filter: impl Fn(&Bytes, Option<&str>, Option<&str>) -> Option<Bytes> + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    #[must_use]
    pub fn on_complete(mut self, completion: Completion) -> Self {
        self.on_complete = Some(completion);
        self
    }
}

impl fmt::Debug for ConsumerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerOptions")
            .field("execute_as", &self.execute_as)
            .field("target", &self.target)
            .field("filter", &self.filter.as_ref().map(|_| "{ ... }"))
            .field("on_complete", &self.on_complete)
            .finish()
    }
}

/// The caller's consumer, resolved once when the request is built.
#[derive(Clone, Default)]
pub enum Consumer {
    #[default]
    Noop,
    /// Called with the [`Delivery`] once the content has run.
    Callback(OnDelivered),
    /// Appended to the content and executed along with it.
    Append(String),
    Structured(ConsumerOptions),
}

impl Consumer {
    pub fn callback(f: impl Fn(&Delivery) + Send + Sync + 'static) -> Self { Self::Callback(Arc::new(f)) }

    pub fn append(literal: impl Into<String>) -> Self { Self::Append(literal.into()) }

    pub(crate) fn filter(&self) -> Option<&Filter> {
        match self {
            Self::Structured(options) => options.filter.as_ref(),
            _ => None,
        }
    }

    /// Literal to append to the content before execution.
    pub(crate) fn trailer(&self) -> Option<&str> {
        match self {
            Self::Append(literal) => Some(literal.as_str()),
            Self::Structured(ConsumerOptions {
                on_complete: Some(Completion::Literal(literal)),
                ..
            }) => Some(literal.as_str()),
            _ => None,
        }
    }

    pub(crate) fn on_delivered(&self) -> Option<&OnDelivered> {
        match self {
            Self::Callback(f) => Some(f),
            Self::Structured(ConsumerOptions {
                on_complete: Some(Completion::Callback(f)),
                ..
            }) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn execute_as(&self) -> Option<&str> {
        match self {
            Self::Structured(options) => options.execute_as.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn target(&self) -> Target {
        match self {
            Self::Structured(ConsumerOptions { target: Some(target), .. }) => target.clone(),
            _ => Target::default(),
        }
    }
}

impl From<ConsumerOptions> for Consumer {
    fn from(options: ConsumerOptions) -> Self { Self::Structured(options) }
}

impl From<&str> for Consumer {
    fn from(literal: &str) -> Self { Self::Append(literal.to_string()) }
}

impl From<String> for Consumer {
    fn from(literal: String) -> Self { Self::Append(literal) }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noop => f.write_str("Consumer::Noop"),
            Self::Callback(_) => f.write_str("Consumer::Callback(..)"),
            Self::Append(literal) => f.debug_tuple("Consumer::Append").field(literal).finish(),
            Self::Structured(options) => f.debug_tuple("Consumer::Structured").field(options).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_has_nothing() {
        let consumer = Consumer::default();
        assert!(consumer.filter().is_none());
        assert!(consumer.trailer().is_none());
        assert!(consumer.on_delivered().is_none());
        assert_eq!(consumer.target(), Target::Execute);
    }

    #[test]
    fn test_literal_completion_becomes_trailer() {
        let consumer = Consumer::from(
            ConsumerOptions::new()
                .execute_as("node")
                .target(Target::Discard)
                .on_complete(Completion::literal("init()")),
        );
        assert_eq!(consumer.trailer(), Some("init()"));
        assert!(consumer.on_delivered().is_none());
        assert_eq!(consumer.execute_as(), Some("node"));
        assert_eq!(consumer.target(), Target::Discard);
    }

    #[test]
    fn test_append_from_str() {
        let consumer = Consumer::from("main()");
        assert_eq!(consumer.trailer(), Some("main()"));
        assert_eq!(format!("{consumer:?}"), "Consumer::Append(\"main()\")");
    }

    #[test]
    fn test_callback_completion() {
        let consumer = Consumer::Structured(
            ConsumerOptions::new()
                .filter(|content, _, _| Some(content.clone()))
                .on_complete(Completion::callback(|_| {})),
        );
        assert!(consumer.filter().is_some());
        assert!(consumer.on_delivered().is_some());
        assert!(consumer.trailer().is_none());
    }
}
