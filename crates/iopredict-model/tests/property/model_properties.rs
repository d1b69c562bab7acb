//! Property tests for iopredict-model: context hashing, edge bookkeeping, accounting.

use proptest::prelude::*;

use iopredict_core::constants::HASH_SEED;
use iopredict_core::hashing::context_hash;
use iopredict_core::traits::FixedCallStack;
use iopredict_core::types::{CallStackId, ContextHash, IoEvent};
use iopredict_core::ModelSettings;
use iopredict_model::{ContextTracker, GraphNode, PredictionModel};

fn call_sites() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..8, 1..200)
}

proptest! {
    /// The hash depends only on the last `k` call sites, oldest first.
    #[test]
    fn context_hash_is_canonical(k in 1u32..12, sites in call_sites()) {
        let mut tracker = ContextTracker::new(k, HASH_SEED);
        let mut last = ContextHash::UNSET;
        for &id in &sites {
            last = tracker.observe(CallStackId(id));
        }

        let k = k as usize;
        let mut window = vec![0u64; k.saturating_sub(sites.len())];
        window.extend(sites.iter().rev().take(k).rev());
        prop_assert_eq!(last, context_hash(&window, HASH_SEED));
    }

    /// Successors stay unique and weights add up to the number of updates.
    #[test]
    fn edges_unique_and_weights_sum(successors in prop::collection::vec(1u64..16, 0..300)) {
        let mut node = GraphNode::new(ContextHash::UNSET);
        for &s in &successors {
            node.update_edge(ContextHash(s));
        }

        let mut seen: Vec<ContextHash> = node.mfu_edges.iter().map(|e| e.successor).collect();
        let before = seen.len();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), before);
        prop_assert_eq!(node.total_weight(), successors.len() as u64);
        if let Some(&last) = successors.last() {
            prop_assert_eq!(node.mru_successor, ContextHash(last));
        }
    }

    /// MFU always names an edge of maximal weight, the first such edge.
    #[test]
    fn mfu_is_first_heaviest(successors in prop::collection::vec(1u64..6, 1..100)) {
        let mut node = GraphNode::new(ContextHash::UNSET);
        for &s in &successors {
            node.update_edge(ContextHash(s));
        }
        let max = node.mfu_edges.iter().map(|e| e.weight).max().unwrap_or(0);
        let first_heaviest = node.mfu_edges.iter().find(|e| e.weight == max).unwrap();
        prop_assert_eq!(node.predict().mfu, first_heaviest.successor);
    }

    /// Hit counts never exceed the number of I/Os and volume adds up.
    #[test]
    fn stats_are_consistent(
        sites in call_sites(),
        handles in prop::collection::vec(0i32..4, 1..200),
        per_handle in any::<bool>(),
    ) {
        let settings = if per_handle {
            ModelSettings::per_handle(3, 8)
        } else {
            ModelSettings::per_process(3, 8)
        };
        let mut model = PredictionModel::init(settings, FixedCallStack::default());
        for (i, &id) in sites.iter().enumerate() {
            let handle = handles[i % handles.len()];
            let event = if i % 2 == 0 {
                IoEvent::read(handle, 10)
            } else {
                IoEvent::write(handle, 5)
            };
            model.on_io_with_call_stack(&event, CallStackId(id), None).unwrap();
        }

        let report = model.report();
        prop_assert_eq!(report.io_count, sites.len() as u64);
        prop_assert_eq!(report.io_volume, report.read_volume + report.write_volume);
        prop_assert!(report.mru_correct_prediction_count <= report.io_count);
        prop_assert!(report.mfu_correct_prediction_count <= report.io_count);
        prop_assert!(report.mru_correct_prediction_volume <= report.io_volume);
    }
}
