// src/engine/work.rs

use std::collections::VecDeque;
use std::sync::Arc;

use crate::spec::{SpecQueue, Specification};

/// The specs one stream hands to its executor.
///
/// - `Assigned`: a fixed eager bucket, consumed front to back.
/// - `Shared`: a claim handle on the lazy queue; every `next_spec` call
///   claims one more spec for this stream.
#[derive(Debug)]
pub enum StreamWork {
    Assigned(VecDeque<Specification>),
    Shared { queue: Arc<SpecQueue>, stream: usize },
}

impl StreamWork {
    pub fn assigned(specs: Vec<Specification>) -> Self {
        StreamWork::Assigned(specs.into())
    }

    pub fn shared(queue: Arc<SpecQueue>, stream: usize) -> Self {
        StreamWork::Shared { queue, stream }
    }

    /// Next spec to execute, or `None` when this stream's work is done.
    pub fn next_spec(&mut self) -> Option<Specification> {
        match self {
            StreamWork::Assigned(specs) => specs.pop_front(),
            StreamWork::Shared { queue, stream } => queue.claim(*stream),
        }
    }

    /// Drain what is left without executing it.
    ///
    /// For a shared queue this returns nothing: unclaimed specs belong to
    /// whichever stream pulls them next.
    pub fn abandon(&mut self) -> Vec<Specification> {
        match self {
            StreamWork::Assigned(specs) => specs.drain(..).collect(),
            StreamWork::Shared { .. } => Vec::new(),
        }
    }

    /// What this stream must account for if it stops early.
    pub fn responsibility(&self) -> Responsibility {
        match self {
            StreamWork::Assigned(specs) => {
                Responsibility::Bucket(specs.iter().map(|s| s.name().to_string()).collect())
            }
            StreamWork::Shared { queue, stream } => Responsibility::Claims {
                queue: Arc::clone(queue),
                stream: *stream,
            },
        }
    }
}

impl Iterator for StreamWork {
    type Item = Specification;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_spec()
    }
}

/// Specs a stream is answerable for, captured before its work is handed off.
#[derive(Debug, Clone)]
pub enum Responsibility {
    /// The whole eager bucket.
    Bucket(Vec<String>),
    /// Whatever the stream has claimed from the shared queue so far.
    Claims { queue: Arc<SpecQueue>, stream: usize },
}

impl Responsibility {
    pub fn spec_names(&self) -> Vec<String> {
        match self {
            Responsibility::Bucket(names) => names.clone(),
            Responsibility::Claims { queue, stream } => queue.claimed_by(*stream),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Responsibility::Claims { .. })
    }
}
