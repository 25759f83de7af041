// src/event.rs

//! Suite lifecycle events.
//!
//! The coordinator only emits; delivery is up to the [`EventBus`]
//! implementation and nothing is read back.

use tracing::info;

use crate::result::SuiteResult;
use crate::types::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub enum SuiteEvent {
    SuiteStart { total_specs: usize, strategy: Strategy },
    SuiteEnd(Box<SuiteResult>),
}

impl SuiteEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SuiteEvent::SuiteStart { .. } => "suite_start",
            SuiteEvent::SuiteEnd(_) => "suite_end",
        }
    }
}

/// Fire-and-forget event sink.
pub trait EventBus: Send + Sync {
    fn notify(&self, event: SuiteEvent);
}

/// Event bus that reports lifecycle events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventBus;

impl EventBus for TracingEventBus {
    fn notify(&self, event: SuiteEvent) {
        match event {
            SuiteEvent::SuiteStart {
                total_specs,
                strategy,
            } => {
                info!(total_specs, %strategy, "suite started");
            }
            SuiteEvent::SuiteEnd(result) => {
                info!(
                    executed = result.specs_executed(),
                    failed = result.specs_failed_count,
                    skipped = result.specs_skipped_count,
                    unhandled_errors = result.unhandled_errors.len(),
                    is_failed = result.is_failed,
                    elapsed_ms = result.execution_time.as_millis() as u64,
                    "suite finished"
                );
            }
        }
    }
}
