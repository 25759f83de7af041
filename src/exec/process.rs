// src/exec/process.rs

//! Production [`WorkerLauncher`]: one child process per stream.

use std::process::Stdio;

use anyhow::{Context, anyhow};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::errors::Error;
use crate::exec::backend::{BoxFuture, RunningWorker, StreamReporter, WorkerLauncher};
use crate::manifest::Manifest;

/// Environment variable carrying the stream index into worker processes.
pub const STREAM_ENV: &str = "PARSPEC_STREAM";

/// Build a shell command appropriate for the platform.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Launches `manifest.runner` for every stream.
///
/// When no runner command is configured there is nothing long-lived to
/// start, and every stream gets an [`InlineWorker`].
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl WorkerLauncher for ProcessLauncher {
    fn start<'a>(
        &'a self,
        manifest: &'a Manifest,
        reporter: StreamReporter,
        cancel: oneshot::Receiver<()>,
    ) -> BoxFuture<'a, Result<Box<dyn RunningWorker>, Error>> {
        Box::pin(async move {
            let Some(runner) = manifest.runner.as_deref() else {
                debug!(stream = reporter.stream(), "no runner configured; using inline worker");
                return Ok(Box::new(InlineWorker::new(cancel)) as Box<dyn RunningWorker>);
            };

            let worker = spawn_runner(runner, manifest, reporter, cancel)?;
            Ok(Box::new(worker) as Box<dyn RunningWorker>)
        })
    }
}

fn spawn_runner(
    runner: &str,
    manifest: &Manifest,
    reporter: StreamReporter,
    cancel: oneshot::Receiver<()>,
) -> Result<ProcessWorker, Error> {
    let stream = reporter.stream();
    info!(stream, cmd = %runner, "starting runner process");

    let mut cmd = shell_command(runner);
    cmd.current_dir(&manifest.project_root)
        .env(STREAM_ENV, stream.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning runner '{runner}' for stream {stream}"))?;

    // A runner that is already gone is not a usable handle.
    if let Some(status) = child
        .try_wait()
        .with_context(|| format!("checking runner status for stream {stream}"))?
    {
        return Err(anyhow!(
            "runner '{runner}' exited during start-up ({status})"
        ));
    }

    forward_output(&mut child, reporter);

    Ok(ProcessWorker {
        stream,
        child: Some(child),
        cancel,
        cancelled: false,
    })
}

/// Drain the runner's output so pipe buffers never fill; log at debug.
fn forward_output(child: &mut Child, reporter: StreamReporter) {
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(stream = reporter.stream(), "{reporter} stdout: {line}");
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(stream = reporter.stream(), "{reporter} stderr: {line}");
            }
        });
    }
}

fn poll_cancel(cancel: &mut oneshot::Receiver<()>, cancelled: &mut bool) -> bool {
    if !*cancelled {
        // A dropped sender just means nobody will ever cancel.
        *cancelled = matches!(cancel.try_recv(), Ok(()));
    }
    *cancelled
}

/// A running runner process.
#[derive(Debug)]
pub struct ProcessWorker {
    stream: usize,
    child: Option<Child>,
    cancel: oneshot::Receiver<()>,
    cancelled: bool,
}

impl RunningWorker for ProcessWorker {
    fn kill(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let Some(mut child) = self.child.take() else {
                return;
            };
            if let Err(e) = child.kill().await {
                warn!(stream = self.stream, error = %e, "failed to kill runner process");
            } else {
                debug!(stream = self.stream, "runner process killed");
            }
        })
    }

    fn is_cancelled(&mut self) -> bool {
        poll_cancel(&mut self.cancel, &mut self.cancelled)
    }
}

/// Worker used when there is no runner process to manage.
#[derive(Debug)]
pub struct InlineWorker {
    cancel: oneshot::Receiver<()>,
    cancelled: bool,
}

impl InlineWorker {
    pub fn new(cancel: oneshot::Receiver<()>) -> Self {
        Self {
            cancel,
            cancelled: false,
        }
    }
}

impl RunningWorker for InlineWorker {
    fn kill(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }

    fn is_cancelled(&mut self) -> bool {
        poll_cancel(&mut self.cancel, &mut self.cancelled)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn manifest_with_runner(runner: Option<&str>) -> Manifest {
        Manifest {
            project_root: std::env::temp_dir(),
            runner: runner.map(str::to_string),
            spec_command: "true".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn starts_and_kills_runner_twice_safely() {
        let manifest = manifest_with_runner(Some("sleep 30"));
        let (_tx, rx) = oneshot::channel();

        let mut worker = ProcessLauncher::new()
            .start(&manifest, StreamReporter::parallel(1), rx)
            .await
            .expect("runner should start");

        worker.kill().await;
        worker.kill().await;
    }

    #[tokio::test]
    async fn inline_worker_without_runner() {
        let manifest = manifest_with_runner(None);
        let (tx, rx) = oneshot::channel();

        let mut worker = ProcessLauncher::new()
            .start(&manifest, StreamReporter::parallel(2), rx)
            .await
            .expect("inline worker always starts");

        assert!(!worker.is_cancelled());
        tx.send(()).unwrap();
        assert!(worker.is_cancelled());
        worker.kill().await;
    }

    #[tokio::test]
    async fn missing_project_root_fails_to_start() {
        let mut manifest = manifest_with_runner(Some("sleep 30"));
        manifest.project_root = "/definitely/not/a/real/dir".into();
        let (_tx, rx) = oneshot::channel();

        let res = ProcessLauncher::new()
            .start(&manifest, StreamReporter::parallel(1), rx)
            .await;
        assert!(res.is_err());
    }
}
