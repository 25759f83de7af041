// src/engine/coordinator.rs

//! The parallel execution coordinator.
//!
//! Lifecycle of one run:
//! 1. emit `SuiteStart`
//! 2. start plugins (the only step allowed to abort the run)
//! 3. resolve the effective stream count
//! 4. plan the distribution for the configured strategy
//! 5. spawn one task per stream and drain the result channel
//! 6. aggregate
//! 7. emit `SuiteEnd`, notify plugins, shut them down

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::engine::aggregate::{AggregateContext, aggregate_results};
use crate::engine::distribution::{Distribution, effective_streams};
use crate::engine::stream::{StreamContext, run_stream};
use crate::engine::work::Responsibility;
use crate::errors::{ParspecError, Result};
use crate::event::{EventBus, SuiteEvent};
use crate::exec::{StreamExecutor, WorkerLauncher};
use crate::manifest::Manifest;
use crate::plugin::{PluginHost, PluginMessage};
use crate::result::{StreamExecError, StreamResult, SuiteResult};
use crate::spec::SpecCollection;
use crate::types::Strategy;

/// Caller-supplied knobs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Requested stream count, before clamping.
    pub streams: usize,
    pub strategy: Strategy,
    pub tags: Option<String>,
}

/// The surrounding system's implementations of every collaborator.
#[derive(Clone)]
pub struct Collaborators {
    pub launcher: Arc<dyn WorkerLauncher>,
    pub executor: Arc<dyn StreamExecutor>,
    pub plugins: Arc<dyn PluginHost>,
    pub events: Arc<dyn EventBus>,
}

pub struct ParallelExecution {
    manifest: Arc<Manifest>,
    specs: SpecCollection,
    options: ExecutionOptions,
    collaborators: Collaborators,
}

impl ParallelExecution {
    pub fn new(
        manifest: Arc<Manifest>,
        specs: SpecCollection,
        options: ExecutionOptions,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            manifest,
            specs,
            options,
            collaborators,
        }
    }

    pub fn number_of_streams(&self) -> usize {
        effective_streams(self.options.streams, self.specs.size())
    }

    /// Run the whole suite.
    ///
    /// Only a plugin start failure is returned as `Err`; everything that goes
    /// wrong inside streams is reported in the returned [`SuiteResult`].
    pub async fn run(self) -> Result<SuiteResult> {
        let started = Instant::now();
        let Self {
            manifest,
            specs,
            options,
            collaborators,
        } = self;

        collaborators.events.notify(SuiteEvent::SuiteStart {
            total_specs: specs.size(),
            strategy: options.strategy,
        });

        let mut plugins = collaborators
            .plugins
            .start_all(&manifest)
            .map_err(|e| ParspecError::PluginStart(format!("{e:#}")))?;

        let streams = effective_streams(options.streams, specs.size());
        info!(
            streams,
            strategy = %options.strategy,
            "Executing in {streams} parallel streams."
        );

        let distribution = Distribution::plan(specs, streams, options.strategy);
        let ctx = StreamContext {
            manifest: Arc::clone(&manifest),
            launcher: Arc::clone(&collaborators.launcher),
            executor: Arc::clone(&collaborators.executor),
        };
        let results = collect(spawn_streams(ctx, distribution)).await;

        let suite = aggregate_results(
            results,
            &AggregateContext {
                started,
                tags: options.tags.clone(),
                strategy: options.strategy,
                streams,
            },
        );

        collaborators
            .events
            .notify(SuiteEvent::SuiteEnd(Box::new(suite.clone())));
        plugins.notify(&PluginMessage::suite_execution_result(&suite));
        plugins.kill_all_gracefully();

        Ok(suite)
    }
}

struct SpawnedStream {
    stream: usize,
    responsibility: Responsibility,
    handle: JoinHandle<()>,
}

/// Spawn every stream plus the closer, returning the receiving end.
///
/// Streams hold clones of the sender. The closer owns the original, waits for
/// every stream task to finish, then drops it, which closes the channel.
fn spawn_streams(
    ctx: StreamContext,
    distribution: Distribution,
) -> mpsc::Receiver<StreamResult> {
    let (tx, rx) = mpsc::channel::<StreamResult>(1);

    let spawned: Vec<SpawnedStream> = distribution
        .into_work()
        .into_iter()
        .map(|(stream, work)| {
            let responsibility = work.responsibility();
            let handle = tokio::spawn(run_stream(ctx.clone(), stream, work, tx.clone()));
            SpawnedStream {
                stream,
                responsibility,
                handle,
            }
        })
        .collect();

    tokio::spawn(close_when_done(spawned, tx));
    rx
}

async fn close_when_done(spawned: Vec<SpawnedStream>, tx: mpsc::Sender<StreamResult>) {
    for s in spawned {
        if let Err(join_err) = s.handle.await {
            // The stream never reported; report on its behalf so its specs
            // are still accounted for.
            error!(stream = s.stream, error = %join_err, "stream task terminated abnormally");
            let err = StreamExecError::new(
                s.responsibility.spec_names(),
                format!("Stream {} terminated abnormally: {join_err}", s.stream),
            );
            if tx.send(StreamResult::start_failure(s.stream, err)).await.is_err() {
                warn!(stream = s.stream, "result channel closed before abnormal stream could report");
            }
        }
    }
    drop(tx);
}

async fn collect(mut rx: mpsc::Receiver<StreamResult>) -> Vec<StreamResult> {
    let mut results = Vec::new();
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    results
}
