// src/spec/queue.rs

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::spec::{SpecCollection, Specification};

/// Shared pull cursor over one collection, used by the lazy strategy.
///
/// Every stream claims the next unclaimed spec with [`SpecQueue::claim`].
/// The cursor and the claim ledger live behind one mutex, so:
/// - no spec is ever handed out twice,
/// - once the cursor passes the end, every further claim returns `None`.
///
/// The ledger remembers which stream claimed each spec so that a stream that
/// stops early can report the specs it claimed but never ran.
#[derive(Debug)]
pub struct SpecQueue {
    specs: Vec<Specification>,
    state: Mutex<QueueState>,
}

#[derive(Debug)]
struct QueueState {
    cursor: usize,
    /// Claiming stream per spec index, filled up to `cursor`.
    owners: Vec<usize>,
}

impl SpecQueue {
    pub fn new(collection: SpecCollection) -> Self {
        let specs = collection.into_specs();
        let owners = Vec::with_capacity(specs.len());
        Self {
            specs,
            state: Mutex::new(QueueState { cursor: 0, owners }),
        }
    }

    /// Claim the next spec for `stream`, or `None` once exhausted.
    pub fn claim(&self, stream: usize) -> Option<Specification> {
        let mut state = self.lock();
        let index = state.cursor;
        let spec = self.specs.get(index)?;

        state.cursor += 1;
        state.owners.push(stream);
        trace!(stream, spec = %spec, index, "claimed spec from shared queue");
        Some(spec.clone())
    }

    /// Names of every spec `stream` has claimed so far, in claim order.
    pub fn claimed_by(&self, stream: usize) -> Vec<String> {
        let state = self.lock();
        state
            .owners
            .iter()
            .zip(&self.specs)
            .filter(|(owner, _)| **owner == stream)
            .map(|(_, spec)| spec.name().to_string())
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.specs.len() - self.lock().cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // The state is a plain cursor; a panicking holder cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(n: usize) -> SpecQueue {
        SpecQueue::new(
            (0..n)
                .map(|i| Specification::from_path(format!("spec_{i}.spec")))
                .collect(),
        )
    }

    #[test]
    fn claims_in_order_then_stays_exhausted() {
        let queue = queue_of(2);

        assert_eq!(queue.claim(1).map(|s| s.name().to_string()), Some("spec_0.spec".into()));
        assert_eq!(queue.claim(2).map(|s| s.name().to_string()), Some("spec_1.spec".into()));
        assert!(queue.is_exhausted());

        for _ in 0..3 {
            assert!(queue.claim(1).is_none());
        }
        assert_eq!(queue.remaining(), 0);
    }

    #[test]
    fn ledger_tracks_claims_per_stream() {
        let queue = queue_of(4);
        queue.claim(1);
        queue.claim(2);
        queue.claim(1);

        assert_eq!(queue.claimed_by(1), vec!["spec_0.spec", "spec_2.spec"]);
        assert_eq!(queue.claimed_by(2), vec!["spec_1.spec"]);
        assert!(queue.claimed_by(3).is_empty());
        assert_eq!(queue.remaining(), 1);
    }

    #[test]
    fn empty_queue_is_exhausted_from_the_start() {
        let queue = queue_of(0);
        assert!(queue.is_exhausted());
        assert!(queue.claim(1).is_none());
    }
}
