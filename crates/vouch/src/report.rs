//! Where failures of detached calls go.

use tracing::error;

use crate::NeedError;

/// Receives the error of a call started with [`Engine::spawn`](crate::Engine::spawn),
/// which has no caller left to return it to.
pub trait Reporter: Send + Sync {
    fn report(&self, error: &NeedError);
}

/// Reports through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, error: &NeedError) { error!(%error, "need failed"); }
}

pub(crate) struct FnReporter<F>(pub(crate) F);

impl<F: Fn(&NeedError) + Send + Sync> Reporter for FnReporter<F> {
    fn report(&self, error: &NeedError) { (self.0)(error); }
}
