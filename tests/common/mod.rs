#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use parspec::engine::ExecutionOptions;
use parspec::manifest::Manifest;
use parspec::result::SuiteResult;
use parspec::types::Strategy;

pub fn manifest() -> Arc<Manifest> {
    Arc::new(Manifest {
        project_root: std::env::temp_dir(),
        spec_command: "true".to_string(),
        ..Default::default()
    })
}

pub fn options(streams: usize, strategy: &str) -> ExecutionOptions {
    ExecutionOptions {
        streams,
        strategy: Strategy::parse_or_default(strategy),
        tags: None,
    }
}

/// Sorted spec names that produced a spec result.
pub fn result_names(suite: &SuiteResult) -> Vec<String> {
    let mut names: Vec<String> = suite
        .spec_results
        .iter()
        .map(|r| r.spec_name.clone())
        .collect();
    names.sort();
    names
}

/// Sorted spec names named as skipped by stream errors.
pub fn skipped_names(suite: &SuiteResult) -> Vec<String> {
    let mut names: Vec<String> = suite
        .unhandled_errors
        .iter()
        .flat_map(|e| e.skipped_specs().to_vec())
        .collect();
    names.sort();
    names
}

pub fn zero_time(mut suite: SuiteResult) -> SuiteResult {
    suite.execution_time = Duration::ZERO;
    suite
}
