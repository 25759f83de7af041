// src/exec/mod.rs

//! Worker and executor layer.
//!
//! - [`backend`] defines the capabilities the coordinator depends on:
//!   `WorkerLauncher`, `RunningWorker` and `StreamExecutor`.
//! - [`process`] is the production launcher, one `tokio::process::Child`
//!   per stream.
//! - [`command`] is the production single-stream executor, which runs the
//!   configured spec command for every spec the stream receives.

pub mod backend;
pub mod command;
pub mod process;

pub use backend::{BoxFuture, RunningWorker, StreamExecutor, StreamReporter, WorkerLauncher};
pub use command::CommandExecutor;
pub use process::{InlineWorker, ProcessLauncher, ProcessWorker};
