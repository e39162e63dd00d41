//! Fetch a resource from an ordered list of mirrors, verify it against an
//! expected digest, and fall back to the next mirror when anything goes wrong.
//!
//! # Architecture
//!
//! - [`SourceList`] - candidate locators plus the trust and stop markers
//! - [`Verifier`] - accepts or rejects content against an [`ExpectedDigest`]
//! - [`Engine`] - drives attempt, verify, deliver and fallback for one [`Request`]
//!
//! Fetching lives in `vouch-fetch`, digests in `vouch-verify` and delivery in
//! `vouch-deliver`; their public types are re-exported here.
//!
//! # Example
//!
//! ```no_run
//! use vouch::{Config, Engine, Request, SourceList};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::system(Config::load("vouch.toml")?)?;
//! let sources = SourceList::new()
//!     .source("https://cdn.example.com/lib.js")
//!     .source("https://mirror.example.org/lib.js")
//!     .source("/srv/vendor/lib.js")
//!     .trust();
//! let request = Request::with_consumer(
//!     "lib.init()",
//!     sources,
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
//! );
//! engine.need(request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The only error [`Engine::need`] returns is [`NeedError::SourcesExhausted`].
//! Per-source failures are logged with `tracing` and never surface.

pub use self::config::{Config, ConfigError, DEFAULT_TIMEOUT};
pub use self::engine::{Engine, EngineBuilder, Observer, Outcome, Phase, Transition};
pub use self::error::{NeedError, Result};
pub use self::report::{LogReporter, Reporter};
pub use self::request::Request;
pub use self::source::{Candidate, Next, Source, SourceList};
pub use self::verify::{ExpectedDigest, Verdict, Verifier};

pub use vouch_deliver::{
    CollectingExecutor, Completion, Consumer, ConsumerOptions, Delivery, ExecutionError, Executor, Filter,
    OnDelivered, Payload, SystemExecutor, Target,
};
pub use vouch_fetch::{
    AttemptError, AttemptSignal, FileTransport, RoutedTransport, SignalTransport, Signalled, Transport,
    TransportError,
};
#[cfg(feature = "reqwest")]
pub use vouch_fetch::ReqwestTransport;
pub use vouch_verify::{CallbackDigest, DigestCompletion, DigestError, DigestProvider, HexDigest, Offloaded, SyncDigest};

#[cfg(feature = "blake3")]
pub use vouch_verify::Blake3;
pub use vouch_verify::Sha256;

mod config;
mod engine;
mod error;
mod report;
mod request;
mod source;
mod verify;
