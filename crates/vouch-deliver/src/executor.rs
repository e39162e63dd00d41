//! The execution environment boundary.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::Target;
use crate::error::ExecutionError;

/// Content ready for the execution environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Filtered content with any trailing literal already appended.
    pub content:    Bytes,
    pub execute_as: Option<String>,
    pub target:     Target,
}

/// Runs or places delivered content.
///
/// Errors raised here are reported to the caller but never cause another
/// source to be tried: the content was already verified.
pub trait Executor: Send + Sync {
    fn execute(&self, payload: Payload) -> impl Future<Output = Result<(), ExecutionError>> + Send;
}

impl<E: Executor> Executor for Arc<E> {
    fn execute(&self, payload: Payload) -> impl Future<Output = Result<(), ExecutionError>> + Send {
        (**self).execute(payload)
    }
}

/// Executes with local processes and places files atomically.
///
/// - [`Target::Execute`] pipes the content into the interpreter's stdin and
///   requires a zero exit status.
/// - [`Target::File`] writes to a temporary file next to the destination and
///   renames it into place.
/// - [`Target::Discard`] does nothing.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    interpreter: String,
}

impl Default for SystemExecutor {
    fn default() -> Self { Self::new() }
}

impl SystemExecutor {
    pub const DEFAULT_INTERPRETER: &'static str = "sh";

    pub fn new() -> Self {
        Self {
            interpreter: Self::DEFAULT_INTERPRETER.to_string(),
        }
    }

    /// Use `interpreter` when a payload does not name one.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn interpreter(&self) -> &str { &self.interpreter }

    async fn run(&self, program: &str, content: &[u8]) -> Result<(), ExecutionError> {
        debug!(program, bytes = content.len(), "executing delivered content");
        let mut child = tokio::process::Command::new(program)
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(content).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(ExecutionError::Exit {
                program: program.to_string(),
                code:    status.code(),
            });
        }
        Ok(())
    }
}

impl Executor for SystemExecutor {
    async fn execute(&self, payload: Payload) -> Result<(), ExecutionError> {
        match payload.target {
            Target::Execute => {
                let program = payload.execute_as.as_deref().unwrap_or(&self.interpreter);
                self.run(program, &payload.content).await
            }
            Target::File(path) => {
                let content = payload.content;
                tokio::task::spawn_blocking(move || place_atomically(&path, &content))
                    .await
                    .map_err(std::io::Error::other)?
            }
            Target::Discard => Ok(()),
        }
    }
}

fn place_atomically(path: &Path, content: &[u8]) -> Result<(), ExecutionError> {
    let place_err = |source| ExecutionError::Place {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut staged = tempfile::Builder::new()
        .prefix(".vouch")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(place_err)?;
    staged.write_all(content).map_err(place_err)?;
    staged.as_file().sync_all().map_err(place_err)?;
    staged.persist(path).map_err(|e| place_err(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "placed delivered content");
    Ok(())
}

/// Records payloads in memory instead of executing them.
#[derive(Debug, Clone, Default)]
pub struct CollectingExecutor {
    payloads: Arc<Mutex<Vec<Payload>>>,
    reject:   Option<String>,
}

impl CollectingExecutor {
    pub fn new() -> Self { Self::default() }

    /// An executor whose every execution fails with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Payloads executed so far, oldest first.
    pub fn payloads(&self) -> Vec<Payload> {
        self.payloads.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Executor for CollectingExecutor {
    async fn execute(&self, payload: Payload) -> Result<(), ExecutionError> {
        if let Some(reason) = &self.reject {
            return Err(ExecutionError::Rejected(reason.clone()));
        }
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload);
        Ok(())
    }
}
