// src/engine/mod.rs

//! Parallel execution engine.
//!
//! This module ties together:
//! - stream-count resolution and the eager/lazy distribution plans
//!   ([`distribution`], [`work`])
//! - the per-stream worker lifecycle ([`stream`])
//! - the order-independent fold of stream results ([`aggregate`])
//! - the coordinator that owns a whole run ([`coordinator`])
//!
//! Distribution and aggregation are pure and tested without Tokio; the
//! stream and coordinator modules are the async shell around them.

pub mod aggregate;
pub mod coordinator;
pub mod distribution;
pub mod stream;
pub mod work;

pub use aggregate::{AggregateContext, aggregate_results};
pub use coordinator::{Collaborators, ExecutionOptions, ParallelExecution};
pub use distribution::{Distribution, distribute_round_robin, effective_streams};
pub use stream::{StreamContext, StreamState, execute_stream, run_stream};
pub use work::{Responsibility, StreamWork};
