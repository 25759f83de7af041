// src/engine/distribution.rs

//! Turning a spec collection and a stream count into per-stream work.
//!
//! Everything here is pure: no tasks, no channels.

use std::sync::Arc;

use tracing::debug;

use crate::engine::work::StreamWork;
use crate::spec::{SpecCollection, SpecQueue, Specification};
use crate::types::Strategy;

/// Effective stream count: `min(requested, total)`, and never zero while
/// there is work.
pub fn effective_streams(requested: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    requested.clamp(1, total)
}

/// Split `specs` into `effective_streams(buckets, specs.len())` buckets,
/// dealing specs out round-robin so bucket sizes differ by at most one.
pub fn distribute_round_robin(
    specs: Vec<Specification>,
    buckets: usize,
) -> Vec<Vec<Specification>> {
    let n = effective_streams(buckets, specs.len());
    let mut out: Vec<Vec<Specification>> = (0..n)
        .map(|_| Vec::with_capacity(specs.len() / n.max(1) + 1))
        .collect();

    for (i, spec) in specs.into_iter().enumerate() {
        out[i % n].push(spec);
    }
    out
}

/// How the run's specs reach its streams.
#[derive(Debug)]
pub enum Distribution {
    /// One fixed bucket per stream.
    Eager(Vec<SpecCollection>),
    /// Every stream pulls from one shared queue.
    Lazy { queue: Arc<SpecQueue>, streams: usize },
}

impl Distribution {
    pub fn plan(specs: SpecCollection, streams: usize, strategy: Strategy) -> Self {
        let streams = effective_streams(streams, specs.size());
        match strategy {
            Strategy::Eager => {
                let buckets = distribute_round_robin(specs.into_specs(), streams);
                debug!(
                    sizes = ?buckets.iter().map(Vec::len).collect::<Vec<_>>(),
                    "planned eager buckets"
                );
                Distribution::Eager(buckets.into_iter().map(SpecCollection::new).collect())
            }
            Strategy::Lazy => Distribution::Lazy {
                queue: Arc::new(SpecQueue::new(specs)),
                streams,
            },
        }
    }

    pub fn streams(&self) -> usize {
        match self {
            Distribution::Eager(buckets) => buckets.len(),
            Distribution::Lazy { streams, .. } => *streams,
        }
    }

    /// One unit of work per stream, paired with its 1-based stream index.
    pub fn into_work(self) -> Vec<(usize, StreamWork)> {
        match self {
            Distribution::Eager(buckets) => buckets
                .into_iter()
                .enumerate()
                .map(|(i, bucket)| (i + 1, StreamWork::assigned(bucket.into_specs())))
                .collect(),
            Distribution::Lazy { queue, streams } => (1..=streams)
                .map(|stream| (stream, StreamWork::shared(Arc::clone(&queue), stream)))
                .collect(),
        }
    }
}
