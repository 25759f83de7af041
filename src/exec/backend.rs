// src/exec/backend.rs

//! Collaborator capabilities the coordinator drives.
//!
//! The coordinator never touches processes directly. It talks to:
//! - a [`WorkerLauncher`] that starts one isolated worker per stream,
//! - the [`RunningWorker`] handle it gets back (only ever killed),
//! - a [`StreamExecutor`] that runs a stream's specs against that worker.
//!
//! Production implementations live in [`super::process`] and
//! [`super::command`]; tests swap in fakes that never spawn anything.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::oneshot;

use crate::engine::StreamWork;
use crate::errors::Error;
use crate::manifest::Manifest;
use crate::result::StreamResult;

/// Boxed, sendable future returned by the collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Identity a worker reports under. One per stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamReporter {
    stream: usize,
}

impl StreamReporter {
    pub fn parallel(stream: usize) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> usize {
        self.stream
    }
}

impl fmt::Display for StreamReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[stream {}]", self.stream)
    }
}

/// Handle to a started worker.
pub trait RunningWorker: Send {
    /// Stop the worker. Idempotent; always safe once execution finished.
    fn kill(&mut self) -> BoxFuture<'_, ()>;

    /// Whether the launcher's cancellation signal has fired.
    fn is_cancelled(&mut self) -> bool {
        false
    }
}

/// Starts one isolated worker bound to a stream's reporter identity.
pub trait WorkerLauncher: Send + Sync {
    /// Returns a usable handle, or an error describing why there is none.
    fn start<'a>(
        &'a self,
        manifest: &'a Manifest,
        reporter: StreamReporter,
        cancel: oneshot::Receiver<()>,
    ) -> BoxFuture<'a, Result<Box<dyn RunningWorker>, Error>>;
}

/// Runs one stream's specs against its worker.
///
/// Never fails: every problem is encoded in the returned [`StreamResult`].
pub trait StreamExecutor: Send + Sync {
    fn execute<'a>(
        &'a self,
        work: StreamWork,
        worker: &'a mut dyn RunningWorker,
        stream: usize,
    ) -> BoxFuture<'a, StreamResult>;
}
