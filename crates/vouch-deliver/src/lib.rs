//! Hands verified content to an execution environment.
//!
//! The caller describes what should happen with a [`Consumer`]: nothing, a
//! callback, a literal to append and run, or a structured set of options
//! with a filter, completion, interpreter and [`Target`]. A [`Deliverer`]
//! applies it and calls an [`Executor`].
//!
//! Nothing in this crate tries another source. A filter veto or an execution
//! failure concerns content that was already verified.

pub use self::consumer::{Completion, Consumer, ConsumerOptions, Filter, OnDelivered, Target};
pub use self::deliverer::{Deliverer, Delivery, TRAILER_SEPARATOR, compose};
pub use self::error::{DeliverError, ExecutionError, Result};
pub use self::executor::{CollectingExecutor, Executor, Payload, SystemExecutor};

mod consumer;
mod deliverer;
mod error;
mod executor;
