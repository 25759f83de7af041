// src/engine/stream.rs

//! One execution stream: start a worker, run the executor, always tear the
//! worker down, and report exactly one result.
//!
//! ```text
//! NotStarted -> ProcessStarting -> Executing   -> Finished
//!                               \-> StartFailed -> Finished
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace, warn};

use crate::engine::work::{Responsibility, StreamWork};
use crate::exec::{StreamExecutor, StreamReporter, WorkerLauncher};
use crate::manifest::Manifest;
use crate::result::{StreamExecError, StreamResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    NotStarted,
    ProcessStarting,
    Executing,
    StartFailed,
    Finished,
}

/// Shared, read-only collaborators every stream uses.
#[derive(Clone)]
pub struct StreamContext {
    pub manifest: Arc<Manifest>,
    pub launcher: Arc<dyn WorkerLauncher>,
    pub executor: Arc<dyn StreamExecutor>,
}

/// Run one stream to completion and send its result on `results`.
///
/// Exactly one send happens, on every path.
pub async fn run_stream(
    ctx: StreamContext,
    stream: usize,
    work: StreamWork,
    results: mpsc::Sender<StreamResult>,
) {
    let result = execute_stream(&ctx, stream, work).await;
    if results.send(result).await.is_err() {
        warn!(stream, "result channel closed before stream could report");
    }
}

/// The stream lifecycle, returning the result instead of sending it.
pub async fn execute_stream(ctx: &StreamContext, stream: usize, work: StreamWork) -> StreamResult {
    let mut state = StreamState::NotStarted;
    let responsibility = work.responsibility();

    transition(stream, &mut state, StreamState::ProcessStarting);
    // Held until the worker is killed so the launcher never sees a
    // spurious "sender dropped".
    let (_cancel_tx, cancel_rx) = oneshot::channel::<()>();
    let reporter = StreamReporter::parallel(stream);

    let mut worker = match ctx.launcher.start(&ctx.manifest, reporter, cancel_rx).await {
        Ok(worker) => worker,
        Err(err) => {
            transition(stream, &mut state, StreamState::StartFailed);
            let result = start_failure(stream, &responsibility, &err);
            transition(stream, &mut state, StreamState::Finished);
            return result;
        }
    };

    transition(stream, &mut state, StreamState::Executing);
    let mut result = ctx.executor.execute(work, worker.as_mut(), stream).await;
    worker.kill().await;

    if result.stream != stream {
        debug!(stream, reported = result.stream, "executor reported a different stream index");
        result.stream = stream;
    }
    if responsibility.is_shared() {
        account_for_abandoned_claims(stream, &responsibility, &mut result);
    }

    transition(stream, &mut state, StreamState::Finished);
    result
}

fn start_failure(
    stream: usize,
    responsibility: &Responsibility,
    err: &crate::errors::Error,
) -> StreamResult {
    let message = format!("Failed to start runner. {err:#}");
    let skipped = responsibility.spec_names();

    error!(stream, error = %format!("{err:#}"), "failed to start runner");
    debug!(stream, skipped = skipped.len(), "skipping specifications");

    StreamResult::start_failure(stream, StreamExecError::new(skipped, message))
}

/// Claimed-but-unexecuted specs become skipped, never dropped.
fn account_for_abandoned_claims(
    stream: usize,
    responsibility: &Responsibility,
    result: &mut StreamResult,
) {
    let executed: HashSet<&str> = result.executed_spec_names();
    let missing: Vec<String> = responsibility
        .spec_names()
        .into_iter()
        .filter(|name| !executed.contains(name.as_str()))
        .collect();

    if missing.is_empty() {
        return;
    }

    warn!(stream, missing = missing.len(), "stream stopped before executing claimed specs");
    result.add_unhandled_error(StreamExecError::new(
        missing,
        format!("Stream {stream} stopped before executing its claimed specifications"),
    ));
}

fn transition(stream: usize, state: &mut StreamState, next: StreamState) {
    trace!(stream, from = ?*state, to = ?next, "stream state");
    *state = next;
}
