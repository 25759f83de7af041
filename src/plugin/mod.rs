// src/plugin/mod.rs

//! Plugins notified at suite boundaries.
//!
//! The coordinator starts plugins once, sends them a single
//! [`PluginMessage`] carrying the aggregate result, then asks them to shut
//! down. Failing to start plugins is the only hard error of a run.

pub mod report;

use serde::Serialize;

use crate::errors::Error;
use crate::manifest::Manifest;
use crate::result::{HookResult, SpecResult, SuiteResult};

pub use report::{ReportPluginHandle, ReportPluginHost};

/// Starts every plugin the manifest asks for.
pub trait PluginHost: Send + Sync {
    fn start_all(&self, manifest: &Manifest) -> Result<Box<dyn PluginHandle>, Error>;
}

/// Running plugins.
pub trait PluginHandle: Send {
    fn notify(&mut self, message: &PluginMessage);
    fn kill_all_gracefully(&mut self);
}

/// Message sent to plugins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum PluginMessage {
    SuiteExecutionResult { suite_result: SuiteExecutionResult },
}

impl PluginMessage {
    pub fn suite_execution_result(result: &SuiteResult) -> Self {
        PluginMessage::SuiteExecutionResult {
            suite_result: SuiteExecutionResult::from(result),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Wire form of a [`SuiteResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteExecutionResult {
    pub is_failed: bool,
    pub specs_failed_count: usize,
    pub specs_skipped_count: usize,
    pub specs_executed_count: usize,
    pub execution_time_ms: u64,
    pub streams: usize,
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_suite: Option<HookResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_suite: Option<HookResult>,
    pub spec_results: Vec<SpecResult>,
    pub unhandled_errors: Vec<String>,
}

impl From<&SuiteResult> for SuiteExecutionResult {
    fn from(r: &SuiteResult) -> Self {
        Self {
            is_failed: r.is_failed,
            specs_failed_count: r.specs_failed_count,
            specs_skipped_count: r.specs_skipped_count,
            specs_executed_count: r.specs_executed(),
            execution_time_ms: u64::try_from(r.execution_time.as_millis()).unwrap_or(u64::MAX),
            streams: r.streams,
            strategy: r.strategy.to_string(),
            tags: r.tags.clone(),
            pre_suite: r.pre_suite.clone(),
            post_suite: r.post_suite.clone(),
            spec_results: r.spec_results.clone(),
            unhandled_errors: r.unhandled_errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}
