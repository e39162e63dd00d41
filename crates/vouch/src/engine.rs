//! The fetch, verify, fall back cycle.
//!
//! ```text
//! Inspecting ─┬─> Stopped
//!             ├─> Exhausted
//!             └─> Attempting ─┬─> Verifying ─┬─> Delivering ─> Done
//!                             │              └─> FallingBack ─> Inspecting
//!                             └─> FallingBack ─> Inspecting
//! ```
//!
//! The cycle runs as a loop over a shrinking [`SourceList`], so arbitrarily
//! long lists cost no stack. Attempts are strictly sequential and a source is
//! never retried within one call.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vouch_deliver::{DeliverError, Deliverer, Delivery, ExecutionError, Executor};
use vouch_fetch::{AttemptController, Transport};
use vouch_verify::{DigestProvider, HexDigest};

use crate::config::Config;
use crate::error::{NeedError, Result};
use crate::report::{FnReporter, LogReporter, Reporter};
use crate::request::Request;
use crate::source::{Candidate, Next};
use crate::verify::{ExpectedDigest, Verdict, Verifier};

/// States of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Inspecting,
    Attempting,
    Verifying,
    Delivering,
    FallingBack,
    Stopped,
    Done,
    Exhausted,
}

impl Phase {
    pub fn is_terminal(self) -> bool { matches!(self, Self::Stopped | Self::Done | Self::Exhausted) }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Inspecting => "Inspecting",
            Phase::Attempting => "Attempting",
            Phase::Verifying => "Verifying",
            Phase::Delivering => "Delivering",
            Phase::FallingBack => "FallingBack",
            Phase::Stopped => "Stopped",
            Phase::Done => "Done",
            Phase::Exhausted => "Exhausted",
        };
        f.write_str(name)
    }
}

/// A state change, reported to the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub phase:  Phase,
    /// The source being worked on, if any.
    pub source: Option<String>,
}

pub type Observer = Arc<dyn Fn(&Transition) + Send + Sync>;

/// How a call ended, short of exhausting its sources.
#[derive(Debug)]
pub enum Outcome {
    Delivered(Delivery),
    /// The stop marker was reached; nothing was delivered.
    Stopped,
    /// The consumer's filter vetoed verified content from `source`.
    Rejected { source: String },
    /// Verified content from `source` failed in the execution environment.
    DeliveryFailed { source: String, error: ExecutionError },
}

impl Outcome {
    pub fn delivery(&self) -> Option<&Delivery> {
        match self {
            Self::Delivered(delivery) => Some(delivery),
            _ => None,
        }
    }
}

pub struct Engine<T, E> {
    attempts:  AttemptController<T>,
    verifier:  Verifier,
    deliverer: Deliverer<E>,
    config:    Config,
    observer:  Option<Observer>,
    reporter:  Arc<dyn Reporter>,
}

impl<T, E> fmt::Debug for Engine<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("verifier", &self.verifier)
            .field("config", &self.config)
            .field("observer", &self.observer.as_ref().map(|_| "{ ... }"))
            .finish_non_exhaustive()
    }
}

impl<T: Transport, E: Executor> Engine<T, E> {
    pub fn builder(transport: T, executor: E) -> EngineBuilder<T, E> { EngineBuilder::new(transport, executor) }

    pub fn config(&self) -> &Config { &self.config }

    pub fn transport(&self) -> &T { self.attempts.transport() }

    pub fn executor(&self) -> &E { self.deliverer.executor() }

    /// Try the request's sources in order until one is delivered.
    ///
    /// Transport failures, timeouts, status errors and digest mismatches all
    /// move on to the next source and are only logged. A filter veto or an
    /// execution failure ends the call without trying further sources.
    ///
    /// # Errors
    ///
    /// [`NeedError::SourcesExhausted`] when the list runs out without a stop
    /// marker. This is the only error.
    pub async fn need(&self, request: Request) -> Result<Outcome> {
        let Request {
            mut sources,
            expected,
            consumer,
            timeout,
        } = request;
        let limit = self.config.resolve_timeout(timeout);

        loop {
            self.transition(Phase::Inspecting, None);
            let Candidate { locator, trusted } = match sources.next() {
                Next::Stop => {
                    debug!("stop marker reached, giving up silently");
                    self.transition(Phase::Stopped, None);
                    return Ok(Outcome::Stopped);
                }
                Next::Exhausted => {
                    self.transition(Phase::Exhausted, None);
                    return Err(NeedError::SourcesExhausted {
                        expected: expected.as_ref().map(|e| e.as_str().to_string()),
                    });
                }
                Next::Attempt(candidate) => candidate,
            };

            self.transition(Phase::Attempting, Some(&locator));
            let deadline = sources.has_further_source().then_some(limit);
            let content = match self.attempts.run(&locator, deadline).await {
                Ok(content) => content,
                Err(error) => {
                    warn!(source = %locator, %error, "failed to load source");
                    self.transition(Phase::FallingBack, Some(&locator));
                    continue;
                }
            };

            self.transition(Phase::Verifying, Some(&locator));
            let actual = match self.verifier.verify(&content, expected.as_ref(), trusted).await {
                Ok(Verdict::Accept { actual }) => actual,
                Ok(Verdict::Reject { actual }) => {
                    warn!(source = %locator, digest = %actual, "source has incorrect digest");
                    self.transition(Phase::FallingBack, Some(&locator));
                    continue;
                }
                Err(error) => {
                    warn!(source = %locator, %error, "could not compute digest");
                    self.transition(Phase::FallingBack, Some(&locator));
                    continue;
                }
            };
            self.note_unpinned(&locator, expected.as_ref(), actual.as_ref(), trusted);

            self.transition(Phase::Delivering, Some(&locator));
            let delivered = self
                .deliverer
                .deliver(
                    content,
                    &consumer,
                    actual.as_ref().map(HexDigest::as_str),
                    expected.as_ref().map(ExpectedDigest::as_str),
                )
                .await;
            self.transition(Phase::Done, Some(&locator));

            return Ok(match delivered {
                Ok(delivery) => {
                    info!(source = %locator, trusted, "delivered verified content");
                    Outcome::Delivered(delivery)
                }
                Err(DeliverError::FilterRejected) => {
                    info!(source = %locator, "consumer filter rejected content");
                    Outcome::Rejected { source: locator }
                }
                Err(DeliverError::Execution(error)) => {
                    warn!(source = %locator, %error, "delivery failed");
                    Outcome::DeliveryFailed { source: locator, error }
                }
            });
        }
    }

    fn note_unpinned(
        &self,
        locator: &str,
        expected: Option<&ExpectedDigest>,
        actual: Option<&HexDigest>,
        trusted: bool,
    ) {
        if expected.is_some() {
            return;
        }
        match actual {
            Some(actual) => warn!(
                source = locator,
                digest = %actual,
                "called without a digest; pin it as {actual}"
            ),
            None if trusted => warn!(source = locator, "trusted source delivered without a digest"),
            None => {}
        }
    }

    fn transition(&self, phase: Phase, source: Option<&str>) {
        if let Some(observer) = &self.observer {
            observer(&Transition {
                phase,
                source: source.map(str::to_string),
            });
        }
    }

    /// Run [`Engine::need`] on the current tokio runtime without a caller to
    /// return to. [`NeedError::SourcesExhausted`] goes to the engine's
    /// [`Reporter`] instead, exactly once.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(self: &Arc<Self>, request: Request) -> JoinHandle<Option<Outcome>>
    where
        T: 'static,
        E: 'static,
    {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            match engine.need(request).await {
                Ok(outcome) => Some(outcome),
                Err(error) => {
                    engine.reporter.report(&error);
                    None
                }
            }
        })
    }

    /// Run [`Engine::need`] to completion on a private current-thread runtime.
    ///
    /// # Errors
    ///
    /// As [`Engine::need`], plus [`NeedError::Runtime`] if the runtime cannot start.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime.
    pub fn need_blocking(&self, request: Request) -> Result<Outcome> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(self.need(request))
    }
}

#[cfg(feature = "reqwest")]
impl Engine<vouch_fetch::RoutedTransport<vouch_fetch::ReqwestTransport>, vouch_deliver::SystemExecutor> {
    /// HTTP(S) plus local files, executing with local processes.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be initialised.
    pub fn system(config: Config) -> std::result::Result<Self, vouch_fetch::TransportError> {
        let transport = vouch_fetch::RoutedTransport::new(
            vouch_fetch::ReqwestTransport::new()?,
            vouch_fetch::FileTransport,
        );
        let mut executor = vouch_deliver::SystemExecutor::new();
        if let Some(interpreter) = &config.interpreter {
            executor = executor.with_interpreter(interpreter.clone());
        }
        Ok(Engine::builder(transport, executor).config(config).build())
    }
}

pub struct EngineBuilder<T, E> {
    transport: T,
    executor:  E,
    provider:  DigestProvider,
    config:    Config,
    observer:  Option<Observer>,
    reporter:  Arc<dyn Reporter>,
}

impl<T: Transport, E: Executor> EngineBuilder<T, E> {
    pub fn new(transport: T, executor: E) -> Self {
        Self {
            transport,
            executor,
            provider: DigestProvider::default(),
            config: Config::default(),
            observer: None,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Digest provider, SHA-256 by default.
    #[must_use]
    pub fn digest(mut self, provider: DigestProvider) -> Self {
        self.provider = provider;
        self
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Shorthand for setting the config timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Called on every state change of every call.
    #[must_use]
    pub fn observe(mut self, observer: impl Fn(&Transition) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    #[must_use]
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Report errors of spawned calls to a closure.
    #[must_use]
    pub fn on_error(self, f: impl Fn(&NeedError) + Send + Sync + 'static) -> Self { self.reporter(FnReporter(f)) }

    pub fn build(self) -> Engine<T, E> {
        Engine {
            attempts:  AttemptController::new(self.transport),
            verifier:  Verifier::new(self.provider),
            deliverer: Deliverer::new(self.executor),
            config:    self.config,
            observer:  self.observer,
            reporter:  self.reporter,
        }
    }
}
