// tests/property_distribution.rs

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use proptest::prelude::*;

use parspec::engine::{
    AggregateContext, Distribution, aggregate_results, distribute_round_robin, effective_streams,
};
use parspec::result::{HookResult, StreamExecError, StreamResult};
use parspec::spec::SpecQueue;
use parspec::types::Strategy as RunStrategy;
use parspec_test_utils::builders::{StreamResultBuilder, spec_collection};

// Streams built from a list of (spec outcome) lists, one list per stream.
// Specs are named by stream and position so names never collide.
fn streams_strategy() -> impl Strategy<Value = Vec<StreamResult>> {
    proptest::collection::vec(
        (
            proptest::collection::vec(0..3u8, 0..5),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        ),
        1..6,
    )
    .prop_map(|streams| {
        streams
            .into_iter()
            .enumerate()
            .map(|(i, (outcomes, pre, post, start_failed))| {
                let stream = i + 1;
                if start_failed {
                    return StreamResult::start_failure(
                        stream,
                        StreamExecError::new(vec![format!("s{stream}_x")], "no runner"),
                    );
                }
                let mut b = StreamResultBuilder::new(stream);
                for (j, outcome) in outcomes.into_iter().enumerate() {
                    let name = format!("s{stream}_{j}");
                    b = match outcome {
                        0 => b.passed(&name),
                        1 => b.failed(&name),
                        _ => b.skipped(&name),
                    };
                }
                if pre {
                    b = b.pre_suite(HookResult::passed(stream as u64));
                }
                if post {
                    b = b.post_suite(HookResult::failed(stream as u64, "teardown"));
                }
                b.build()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn effective_streams_is_min_and_never_zero_with_work(n in 1usize..64, s in 0usize..64) {
        let e = effective_streams(n, s);
        prop_assert_eq!(e, n.min(s));
        prop_assert_eq!(e == 0, s == 0);
    }

    #[test]
    fn eager_buckets_partition_input(n in 1usize..20, s in 0usize..100) {
        let specs = spec_collection(s);
        let expected: Vec<String> = specs.spec_names();
        let buckets = distribute_round_robin(specs.into_specs(), n);

        prop_assert_eq!(buckets.len(), effective_streams(n, s));

        let mut seen: Vec<String> = buckets
            .iter()
            .flatten()
            .map(|spec| spec.name().to_string())
            .collect();
        seen.sort();
        let mut expected_sorted = expected;
        expected_sorted.sort();
        prop_assert_eq!(seen, expected_sorted);

        let sizes: Vec<usize> = buckets.iter().map(Vec::len).collect();
        if let (Some(max), Some(min)) = (sizes.iter().max(), sizes.iter().min()) {
            prop_assert!(max - min <= 1);
            prop_assert!(*min >= 1);
        }
    }

    #[test]
    fn lazy_plan_spawns_effective_stream_count(n in 1usize..20, s in 0usize..50) {
        let plan = Distribution::plan(spec_collection(s), n, RunStrategy::Lazy);
        prop_assert_eq!(plan.streams(), effective_streams(n, s));
    }

    #[test]
    fn concurrent_claims_hand_out_each_spec_once(s in 0usize..200, pullers in 1usize..8) {
        let queue = Arc::new(SpecQueue::new(spec_collection(s)));

        let handles: Vec<_> = (1..=pullers)
            .map(|stream| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Some(spec) = queue.claim(stream) {
                        mine.push(spec.name().to_string());
                    }
                    // Exhaustion is terminal.
                    for _ in 0..3 {
                        assert!(queue.claim(stream).is_none());
                    }
                    mine
                })
            })
            .collect();

        let mut all = Vec::new();
        for h in handles {
            all.extend(h.join().unwrap());
        }

        prop_assert_eq!(all.len(), s);
        let unique: HashSet<&String> = all.iter().collect();
        prop_assert_eq!(unique.len(), s);
        prop_assert!(queue.is_exhausted());
    }

    #[test]
    fn aggregation_ignores_arrival_order(
        results in streams_strategy(),
        seed in any::<u64>(),
    ) {
        let ctx = AggregateContext {
            started: Instant::now(),
            tags: Some("prop".to_string()),
            strategy: RunStrategy::Eager,
            streams: results.len(),
        };

        let mut shuffled = results.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            shuffled.swap(i, j);
        }

        let mut a = aggregate_results(results, &ctx);
        let mut b = aggregate_results(shuffled, &ctx);
        a.execution_time = Duration::ZERO;
        b.execution_time = Duration::ZERO;
        prop_assert_eq!(a, b);
    }
}
