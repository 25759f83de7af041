use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::oneshot;

use parspec::engine::{Collaborators, StreamWork};
use parspec::errors::Error;
use parspec::event::{EventBus, SuiteEvent};
use parspec::exec::{BoxFuture, RunningWorker, StreamExecutor, StreamReporter, WorkerLauncher};
use parspec::manifest::Manifest;
use parspec::plugin::{PluginHandle, PluginHost, PluginMessage};
use parspec::result::{SpecResult, StreamResult};

/// A fake launcher that:
/// - refuses to start workers for the configured streams
/// - records which streams were started and which workers were killed.
#[derive(Clone, Default)]
pub struct FakeLauncher {
    failing_streams: HashSet<usize>,
    started: Arc<Mutex<Vec<usize>>>,
    killed: Arc<Mutex<Vec<usize>>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(streams: &[usize]) -> Self {
        Self {
            failing_streams: streams.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn started(&self) -> Vec<usize> {
        let mut v = self.started.lock().unwrap().clone();
        v.sort_unstable();
        v
    }

    pub fn killed(&self) -> Vec<usize> {
        let mut v = self.killed.lock().unwrap().clone();
        v.sort_unstable();
        v
    }
}

impl WorkerLauncher for FakeLauncher {
    fn start<'a>(
        &'a self,
        _manifest: &'a Manifest,
        reporter: StreamReporter,
        _cancel: oneshot::Receiver<()>,
    ) -> BoxFuture<'a, Result<Box<dyn RunningWorker>, Error>> {
        Box::pin(async move {
            let stream = reporter.stream();
            if self.failing_streams.contains(&stream) {
                return Err(anyhow!("worker for stream {stream} refused to start"));
            }
            self.started.lock().unwrap().push(stream);
            Ok(Box::new(FakeWorker {
                stream,
                killed: Arc::clone(&self.killed),
                dead: false,
            }) as Box<dyn RunningWorker>)
        })
    }
}

pub struct FakeWorker {
    stream: usize,
    killed: Arc<Mutex<Vec<usize>>>,
    dead: bool,
}

impl RunningWorker for FakeWorker {
    fn kill(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if !self.dead {
                self.dead = true;
                self.killed.lock().unwrap().push(self.stream);
            }
        })
    }
}

/// A fake single-stream executor that:
/// - drains its `StreamWork`, recording which specs each stream ran
/// - fails the configured specs, passes everything else
/// - optionally sleeps per spec so concurrent streams interleave
/// - optionally claims one extra spec and stops without running it
/// - optionally panics on a stream after taking its first spec.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    failing_specs: HashSet<String>,
    delay: Duration,
    stream_delays: HashMap<usize, Duration>,
    abandon_after: HashMap<usize, usize>,
    panicking: HashSet<usize>,
    executed: Arc<Mutex<BTreeMap<usize, Vec<String>>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_spec(mut self, name: &str) -> Self {
        self.failing_specs.insert(name.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_stream_delay(mut self, stream: usize, delay: Duration) -> Self {
        self.stream_delays.insert(stream, delay);
        self
    }

    /// After running `n` specs, `stream` claims one more and gives up.
    pub fn abandon_after(mut self, stream: usize, n: usize) -> Self {
        self.abandon_after.insert(stream, n);
        self
    }

    /// `stream` takes one spec, then its task panics.
    pub fn panicking_on(mut self, stream: usize) -> Self {
        self.panicking.insert(stream);
        self
    }

    pub fn executed(&self) -> BTreeMap<usize, Vec<String>> {
        self.executed.lock().unwrap().clone()
    }

    pub fn all_executed(&self) -> Vec<String> {
        let mut all: Vec<String> = self.executed().into_values().flatten().collect();
        all.sort();
        all
    }
}

impl StreamExecutor for FakeExecutor {
    fn execute<'a>(
        &'a self,
        mut work: StreamWork,
        _worker: &'a mut dyn RunningWorker,
        stream: usize,
    ) -> BoxFuture<'a, StreamResult> {
        Box::pin(async move {
            let mut result = StreamResult::new(stream);
            let delay = self.stream_delays.get(&stream).copied().unwrap_or(self.delay);
            let mut ran = 0;

            while let Some(spec) = work.next_spec() {
                if self.panicking.contains(&stream) {
                    panic!("executor for stream {stream} panicked on {spec}");
                }
                if self.abandon_after.get(&stream) == Some(&ran) {
                    break;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                self.executed
                    .lock()
                    .unwrap()
                    .entry(stream)
                    .or_default()
                    .push(spec.name().to_string());

                if self.failing_specs.contains(spec.name()) {
                    result.add_spec_result(SpecResult::failed(spec.name(), 1, "assertion failed"));
                } else {
                    result.add_spec_result(SpecResult::passed(spec.name(), 1));
                }
                ran += 1;
            }

            result
        })
    }
}

/// Plugin host that records every call as a line of text.
#[derive(Clone, Default)]
pub struct RecordingPlugins {
    fail_start: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl PluginHost for RecordingPlugins {
    fn start_all(&self, _manifest: &Manifest) -> Result<Box<dyn PluginHandle>, Error> {
        if self.fail_start {
            return Err(anyhow!("plugin binary missing"));
        }
        self.log.lock().unwrap().push("start".to_string());
        Ok(Box::new(RecordingPluginHandle {
            log: Arc::clone(&self.log),
        }))
    }
}

struct RecordingPluginHandle {
    log: Arc<Mutex<Vec<String>>>,
}

impl PluginHandle for RecordingPluginHandle {
    fn notify(&mut self, message: &PluginMessage) {
        let json = message.to_json().expect("plugin message serialises");
        self.log.lock().unwrap().push(json);
    }

    fn kill_all_gracefully(&mut self) {
        self.log.lock().unwrap().push("kill".to_string());
    }
}

/// Event bus that keeps every event it is given.
#[derive(Clone, Default)]
pub struct RecordingEventBus {
    events: Arc<Mutex<Vec<SuiteEvent>>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SuiteEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(SuiteEvent::name).collect()
    }
}

impl EventBus for RecordingEventBus {
    fn notify(&self, event: SuiteEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Bundle fakes into the coordinator's collaborator set.
pub fn collaborators(
    launcher: &FakeLauncher,
    executor: &FakeExecutor,
    plugins: &RecordingPlugins,
    events: &RecordingEventBus,
) -> Collaborators {
    Collaborators {
        launcher: Arc::new(launcher.clone()),
        executor: Arc::new(executor.clone()),
        plugins: Arc::new(plugins.clone()),
        events: Arc::new(events.clone()),
    }
}
