// src/result.rs

//! Per-spec, per-stream and suite-level results.
//!
//! A [`StreamResult`] is produced exactly once per stream and handed to the
//! coordinator over the result channel. The coordinator folds all of them
//! into one immutable [`SuiteResult`].

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::types::Strategy;

/// Outcome of one specification as reported by a single-stream executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecResult {
    pub spec_name: String,
    pub failed: bool,
    pub skipped: bool,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SpecResult {
    pub fn passed(spec_name: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            spec_name: spec_name.into(),
            failed: false,
            skipped: false,
            execution_time_ms,
            errors: Vec::new(),
        }
    }

    pub fn failed(
        spec_name: impl Into<String>,
        execution_time_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            spec_name: spec_name.into(),
            failed: true,
            skipped: false,
            execution_time_ms,
            errors: vec![error.into()],
        }
    }

    pub fn skipped(spec_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            spec_name: spec_name.into(),
            failed: false,
            skipped: true,
            execution_time_ms: 0,
            errors: vec![reason.into()],
        }
    }
}

/// Result of a before-suite or after-suite hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResult {
    pub failed: bool,
    pub error_message: Option<String>,
    pub execution_time_ms: u64,
}

impl HookResult {
    pub fn passed(execution_time_ms: u64) -> Self {
        Self {
            failed: false,
            error_message: None,
            execution_time_ms,
        }
    }

    pub fn failed(execution_time_ms: u64, message: impl Into<String>) -> Self {
        Self {
            failed: true,
            error_message: Some(message.into()),
            execution_time_ms,
        }
    }
}

/// Specifications a stream could not run, and why.
///
/// This is a value carried in a result's unhandled errors, never an abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "The following specifications could not be executed:\n{}Reason : {message}.",
    spec_lines(.specs_skipped)
)]
pub struct StreamExecError {
    pub specs_skipped: Vec<String>,
    pub message: String,
}

impl StreamExecError {
    pub fn new(specs_skipped: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            specs_skipped,
            message: message.into(),
        }
    }
}

fn spec_lines(specs: &[String]) -> String {
    specs.iter().map(|s| format!("{s}\n")).collect()
}

/// An error recorded inside a result instead of being raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnhandledError {
    #[error(transparent)]
    StreamExec(#[from] StreamExecError),

    #[error("{0}")]
    Message(String),
}

impl UnhandledError {
    /// Spec names this error accounts for as skipped.
    pub fn skipped_specs(&self) -> &[String] {
        match self {
            UnhandledError::StreamExec(e) => &e.specs_skipped,
            UnhandledError::Message(_) => &[],
        }
    }
}

/// Partial suite result produced by one stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamResult {
    /// 1-based stream index.
    pub stream: usize,
    pub specs_failed_count: usize,
    pub spec_results: Vec<SpecResult>,
    pub is_failed: bool,
    pub pre_suite: Option<HookResult>,
    pub post_suite: Option<HookResult>,
    pub unhandled_errors: Vec<UnhandledError>,
    pub execution_time_ms: u64,
}

impl StreamResult {
    pub fn new(stream: usize) -> Self {
        Self {
            stream,
            ..Default::default()
        }
    }

    /// Result of a stream whose worker never became usable: no spec results,
    /// exactly one error naming what was skipped, and marked failed.
    pub fn start_failure(stream: usize, error: StreamExecError) -> Self {
        Self {
            stream,
            is_failed: true,
            unhandled_errors: vec![error.into()],
            ..Default::default()
        }
    }

    pub fn add_spec_result(&mut self, result: SpecResult) {
        if result.failed {
            self.specs_failed_count += 1;
            self.is_failed = true;
        }
        self.spec_results.push(result);
    }

    pub fn add_unhandled_error(&mut self, error: impl Into<UnhandledError>) {
        self.unhandled_errors.push(error.into());
        self.is_failed = true;
    }

    pub fn executed_spec_names(&self) -> HashSet<&str> {
        self.spec_results
            .iter()
            .map(|r| r.spec_name.as_str())
            .collect()
    }
}

/// Aggregate of every stream's result. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteResult {
    pub specs_failed_count: usize,
    pub spec_results: Vec<SpecResult>,
    pub is_failed: bool,
    pub pre_suite: Option<HookResult>,
    pub post_suite: Option<HookResult>,
    pub unhandled_errors: Vec<UnhandledError>,
    pub specs_skipped_count: usize,
    pub execution_time: Duration,
    pub tags: Option<String>,
    pub strategy: Strategy,
    pub streams: usize,
}

impl SuiteResult {
    pub fn new(tags: Option<String>, strategy: Strategy, streams: usize) -> Self {
        Self {
            specs_failed_count: 0,
            spec_results: Vec::new(),
            is_failed: false,
            pre_suite: None,
            post_suite: None,
            unhandled_errors: Vec::new(),
            specs_skipped_count: 0,
            execution_time: Duration::ZERO,
            tags,
            strategy,
            streams,
        }
    }

    /// Recompute the skipped count from the aggregate state.
    ///
    /// A spec counts once: either through a skipped spec result, or through
    /// a stream error naming it when no spec result for it exists.
    pub fn set_specs_skipped_count(&mut self) {
        let with_result: HashSet<&str> = self
            .spec_results
            .iter()
            .map(|r| r.spec_name.as_str())
            .collect();
        let flagged = self.spec_results.iter().filter(|r| r.skipped).count();

        let mut only_in_errors = HashSet::new();
        for error in &self.unhandled_errors {
            for name in error.skipped_specs() {
                if !with_result.contains(name.as_str()) {
                    only_in_errors.insert(name.as_str());
                }
            }
        }

        self.specs_skipped_count = flagged + only_in_errors.len();
    }

    pub fn specs_executed(&self) -> usize {
        self.spec_results.iter().filter(|r| !r.skipped).count()
    }

    pub fn specs_passed(&self) -> usize {
        self.specs_executed() - self.specs_failed_count
    }
}
