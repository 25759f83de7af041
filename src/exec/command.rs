// src/exec/command.rs

//! Production [`StreamExecutor`]: runs the configured spec command once per
//! specification, in the stream's own order.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::engine::StreamWork;
use crate::exec::backend::{BoxFuture, RunningWorker, StreamExecutor};
use crate::exec::process::{STREAM_ENV, shell_command};
use crate::manifest::Manifest;
use crate::result::{HookResult, SpecResult, StreamResult};
use crate::spec::Specification;

/// Environment variable carrying the spec name into the spec command.
pub const SPEC_ENV: &str = "PARSPEC_SPEC";

#[derive(Debug, Clone)]
pub struct CommandExecutor {
    manifest: Arc<Manifest>,
}

impl CommandExecutor {
    pub fn new(manifest: Arc<Manifest>) -> Self {
        Self { manifest }
    }
}

impl StreamExecutor for CommandExecutor {
    fn execute<'a>(
        &'a self,
        mut work: StreamWork,
        worker: &'a mut dyn RunningWorker,
        stream: usize,
    ) -> BoxFuture<'a, StreamResult> {
        Box::pin(async move {
            let started = Instant::now();
            let mut result = StreamResult::new(stream);

            let mut setup_failed = false;
            if let Some(hook) = self.manifest.before_suite.as_deref() {
                let hook_result = self.run_hook(hook, stream).await;
                setup_failed = hook_result.failed;
                result.pre_suite = Some(hook_result);
            }

            if setup_failed {
                // A shared queue is left untouched for the healthy streams.
                result.is_failed = true;
                skip_all(&mut result, &mut work, "before-suite hook failed");
            } else {
                self.run_specs(&mut result, &mut work, worker, stream).await;
            }

            if let Some(hook) = self.manifest.after_suite.as_deref() {
                let hook_result = self.run_hook(hook, stream).await;
                if hook_result.failed {
                    result.is_failed = true;
                }
                result.post_suite = Some(hook_result);
            }

            result.execution_time_ms = elapsed_ms(started);
            result
        })
    }
}

impl CommandExecutor {
    async fn run_specs(
        &self,
        result: &mut StreamResult,
        work: &mut StreamWork,
        worker: &mut dyn RunningWorker,
        stream: usize,
    ) {
        while let Some(spec) = work.next_spec() {
            if worker.is_cancelled() {
                info!(stream, "execution cancelled; skipping remaining specs");
                result.add_spec_result(SpecResult::skipped(spec.name(), "execution cancelled"));
                skip_all(result, work, "execution cancelled");
                break;
            }
            let spec_result = self.run_spec(&spec, stream).await;
            result.add_spec_result(spec_result);
        }
    }

    async fn run_spec(&self, spec: &Specification, stream: usize) -> SpecResult {
        let started = Instant::now();
        let line = format!("{} \"{}\"", self.manifest.spec_command, spec.path().display());
        debug!(stream, spec = %spec, cmd = %line, "executing spec");

        match self.run_command(&line, stream, Some(spec)).await {
            Ok(()) => SpecResult::passed(spec.name(), elapsed_ms(started)),
            Err(reason) => {
                warn!(stream, spec = %spec, %reason, "spec failed");
                SpecResult::failed(spec.name(), elapsed_ms(started), reason)
            }
        }
    }

    async fn run_hook(&self, hook: &str, stream: usize) -> HookResult {
        let started = Instant::now();
        match self.run_command(hook, stream, None).await {
            Ok(()) => HookResult::passed(elapsed_ms(started)),
            Err(reason) => {
                warn!(stream, cmd = %hook, %reason, "suite hook failed");
                HookResult::failed(elapsed_ms(started), reason)
            }
        }
    }

    /// Run one shell command to completion; `Err` carries a readable reason.
    async fn run_command(
        &self,
        line: &str,
        stream: usize,
        spec: Option<&Specification>,
    ) -> Result<(), String> {
        let mut cmd = shell_command(line);
        cmd.current_dir(&self.manifest.project_root)
            .env(STREAM_ENV, stream.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(spec) = spec {
            cmd.env(SPEC_ENV, spec.name());
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| format!("could not run '{line}': {e}"))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output.status.code().unwrap_or(-1);
        match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
            Some(last) => Err(format!("exit code {code}: {}", last.trim())),
            None => Err(format!("exit code {code}")),
        }
    }
}

fn skip_all(result: &mut StreamResult, work: &mut StreamWork, reason: &str) {
    for spec in work.abandon() {
        result.add_spec_result(SpecResult::skipped(spec.name(), reason));
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
