//! Single fetch attempts with timeouts over pluggable transports.
//!
//! # Architecture
//!
//! - [`Transport`] - retrieves raw bytes for a source identifier
//! - [`AttemptController`] - runs one attempt, arms the deadline, classifies the outcome
//! - [`Signalled`] - adapts callback-style transports, settling each attempt once
//!
//! Which source to try next, and what to do with the bytes, is the caller's business.

pub use self::attempt::AttemptController;
pub use self::error::{AttemptError, Result, TransportError};
pub use self::file::{FileTransport, RoutedTransport, is_local};
pub use self::signal::{AttemptSignal, SignalTransport, Signalled};
pub use self::transport::Transport;

#[cfg(feature = "reqwest")]
pub use self::http::{ReqwestTransport, ReqwestTransportBuilder};

mod attempt;
mod error;
mod file;
mod signal;
mod transport;

#[cfg(feature = "reqwest")]
mod http;
