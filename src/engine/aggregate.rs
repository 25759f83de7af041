// src/engine/aggregate.rs

//! Folding per-stream results into one suite result.
//!
//! Results are sorted by stream index first, so arrival order on the
//! channel has no effect on the outcome: spec results keep each stream's
//! internal order, streams appear in index order, and the first hook result
//! found (lowest stream) is kept.

use std::time::Instant;

use tracing::debug;

use crate::result::{StreamResult, SuiteResult};
use crate::types::Strategy;

/// Run-level facts the aggregate records alongside the folded results.
#[derive(Debug, Clone)]
pub struct AggregateContext {
    pub started: Instant,
    pub tags: Option<String>,
    pub strategy: Strategy,
    pub streams: usize,
}

pub fn aggregate_results(mut results: Vec<StreamResult>, ctx: &AggregateContext) -> SuiteResult {
    results.sort_by_key(|r| r.stream);

    let mut suite = SuiteResult::new(ctx.tags.clone(), ctx.strategy, ctx.streams);
    for result in results {
        fold_into(&mut suite, result);
    }

    suite.execution_time = ctx.started.elapsed();
    suite.set_specs_skipped_count();
    suite
}

fn fold_into(suite: &mut SuiteResult, result: StreamResult) {
    debug!(
        stream = result.stream,
        elapsed_ms = result.execution_time_ms,
        specs = result.spec_results.len(),
        failed = result.is_failed,
        "stream finished"
    );
    suite.specs_failed_count += result.specs_failed_count;
    suite.spec_results.extend(result.spec_results);
    suite.is_failed |= result.is_failed;

    if suite.pre_suite.is_none() {
        suite.pre_suite = result.pre_suite;
    }
    if suite.post_suite.is_none() {
        suite.post_suite = result.post_suite;
    }

    suite.unhandled_errors.extend(result.unhandled_errors);
}
