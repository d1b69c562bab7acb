//! End-to-end tests driving PredictionModel through its public entry points.

use std::collections::VecDeque;
use std::io::{self, Write};

use iopredict_core::constants::HASH_SEED;
use iopredict_core::errors::ModelError;
use iopredict_core::hashing::context_hash;
use iopredict_core::traits::{CallStackSource, FixedCallStack};
use iopredict_core::types::{CallStackId, ContextHash, IoEvent, NodeSeed};
use iopredict_core::ModelSettings;
use iopredict_model::{Prediction, PredictionModel};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Replays scripted call-stack ids and records the depth it was asked for.
#[derive(Default)]
struct ScriptedSource {
    ids: VecDeque<u64>,
    depths: Vec<u32>,
}

impl ScriptedSource {
    fn new(ids: &[u64]) -> Self {
        Self {
            ids: ids.iter().copied().collect(),
            depths: Vec::new(),
        }
    }
}

impl CallStackSource for ScriptedSource {
    fn capture(&mut self, depth: u32) -> CallStackId {
        self.depths.push(depth);
        CallStackId(self.ids.pop_front().unwrap_or(0))
    }
}

struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn h(window: &[u64]) -> ContextHash {
    context_hash(window, HASH_SEED)
}

fn feed<S: CallStackSource>(model: &mut PredictionModel<S>, handle: i32, ids: &[u64]) {
    for &id in ids {
        model
            .on_io_with_call_stack(&IoEvent::read(handle, 100), CallStackId(id), None)
            .unwrap();
    }
}

const REPORT_KEYS: [&str; 19] = [
    "context_size",
    "call_stack_depth",
    "granularity",
    "overall_app_duration",
    "io_time_ns",
    "io_count",
    "io_volume",
    "read_volume",
    "write_volume",
    "mru_correct_prediction_count",
    "mru_correct_prediction_volume",
    "mru_correct_prediction_io_time",
    "mfu_correct_prediction_count",
    "mfu_correct_prediction_volume",
    "mfu_correct_prediction_io_time",
    "call_stack_instrumentation_count",
    "call_stack_instrumentation_time_ns",
    "model_prediction_time_ns",
    "model_memory_footprint",
];

// ---------------------------------------------------------------------------
// Process scope
// ---------------------------------------------------------------------------

#[test]
fn test_process_scope_short_sequence() {
    let mut model = PredictionModel::init(ModelSettings::per_process(2, 4), FixedCallStack::default());
    feed(&mut model, 3, &[1, 1, 2, 1, 2]);

    let report = model.report();
    assert_eq!(report.io_count, 5);
    assert_eq!(report.io_volume, 500);
    assert_eq!(report.read_volume, 500);
    assert_eq!(report.write_volume, 0);
    // The repeated call site on the second I/O is the only cold-start hit.
    assert_eq!(report.mru_correct_prediction_count, 1);
    assert_eq!(report.mfu_correct_prediction_count, 1);
    assert_eq!(report.mru_correct_prediction_volume, 100);

    let graph = model.scope().entry(3).unwrap().graph();
    assert_eq!(graph.len(), 4);
    let after_repeat = graph.node(h(&[1, 1])).unwrap();
    assert_eq!(after_repeat.mfu_edges.len(), 1);
    assert_eq!(after_repeat.mfu_edges[0].successor, h(&[1, 2]));
    let alternating = graph.node(h(&[1, 2])).unwrap();
    assert_eq!(alternating.mru_successor, h(&[2, 1]));

    // [1,2] has been followed by [2,1] before, so both heuristics expect it next.
    let pending = model.pending(3).unwrap();
    assert_eq!(pending, Prediction { mru: h(&[2, 1]), mfu: h(&[2, 1]) });

    feed(&mut model, 3, &[1]);
    let report = model.report();
    assert_eq!(report.mru_correct_prediction_count, 2);
    assert_eq!(report.mfu_correct_prediction_count, 2);
}

#[test]
fn test_on_io_captures_with_configured_depth() {
    let mut model = PredictionModel::init(
        ModelSettings::per_process(2, 7),
        ScriptedSource::new(&[4, 4, 4]),
    );
    for _ in 0..3 {
        model.on_io(&IoEvent::write(1, 10), None).unwrap();
    }

    assert_eq!(model.source_mut().depths, vec![7, 7, 7]);
    let report = model.report();
    assert_eq!(report.call_stack_instrumentation_count, 3);
    assert_eq!(report.write_volume, 30);
    assert_eq!(model.stats().io_count, 3);
}

#[test]
fn test_open_and_close_count_as_io_without_volume() {
    let mut model = PredictionModel::init(ModelSettings::default(), FixedCallStack::default());
    let open = IoEvent::open(5).with_duration(40);
    let close = IoEvent::close(5).with_duration(60);
    model.on_io_with_call_stack(&open, CallStackId(1), None).unwrap();
    model.on_io_with_call_stack(&close, CallStackId(2), None).unwrap();

    let report = model.report();
    assert_eq!(report.io_count, 2);
    assert_eq!(report.io_volume, 0);
    assert_eq!(report.io_time_ns, 100);
    // Process scope keeps its graph across close.
    assert_eq!(model.scope().node_count(), 2);
}

// ---------------------------------------------------------------------------
// Handle scope
// ---------------------------------------------------------------------------

#[test]
fn test_handle_scope_self_loop_suppresses_cold_start_hit() {
    let mut model = PredictionModel::init(ModelSettings::per_handle(2, 4), FixedCallStack::default());
    feed(&mut model, 3, &[1, 1]);

    let report = model.report();
    assert_eq!(report.granularity, "per-handle");
    assert_eq!(report.mru_correct_prediction_count, 0);
    assert_eq!(report.mfu_correct_prediction_count, 0);
}

#[test]
fn test_handle_scope_with_unset_seed_falls_back_to_call_site() {
    let settings = ModelSettings::per_handle(2, 4).with_node_seed(NodeSeed::Unset);
    let mut model = PredictionModel::init(settings, FixedCallStack::default());
    feed(&mut model, 3, &[1, 1]);

    let report = model.report();
    assert_eq!(report.mru_correct_prediction_count, 1);
    assert_eq!(report.mfu_correct_prediction_count, 1);
}

#[test]
fn test_close_discards_graph_after_update() {
    let mut model = PredictionModel::init(ModelSettings::per_handle(2, 4), FixedCallStack::default());
    model
        .on_io_with_call_stack(&IoEvent::open(8), CallStackId(1), None)
        .unwrap();
    feed(&mut model, 8, &[2, 3]);
    let outcome = model
        .on_io_with_call_stack(&IoEvent::close(8), CallStackId(4), None)
        .unwrap();

    // The close itself was folded into the graph before it was dropped.
    assert_eq!(outcome.context, h(&[3, 4]));
    assert!(model.pending(8).is_none());
    assert_eq!(model.scope().graph_count(), 0);
    assert_eq!(model.report().io_count, 4);
}

#[test]
fn test_footprint_keeps_high_water_mark_after_close() {
    let mut model = PredictionModel::init(ModelSettings::per_handle(4, 4), FixedCallStack::default());
    feed(&mut model, 3, &(1..=64).collect::<Vec<_>>());
    let peak = model.memory_footprint();
    model
        .on_io_with_call_stack(&IoEvent::close(3), CallStackId(65), None)
        .unwrap();

    assert!(model.memory_footprint() < peak);
    assert!(model.report().model_memory_footprint >= peak);
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[test]
fn test_dump_line_order() {
    let mut model = PredictionModel::init(ModelSettings::per_process(2, 4), FixedCallStack::default());
    feed(&mut model, 3, &[1, 2]);

    let mut out = Vec::new();
    let report = model.results_dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), REPORT_KEYS.len());
    for (line, key) in lines.iter().zip(REPORT_KEYS) {
        let (k, v) = line.split_once('=').unwrap();
        assert_eq!(k, key);
        assert!(!v.is_empty());
    }
    assert_eq!(lines[0], "context_size=2");
    assert_eq!(lines[1], "call_stack_depth=4");
    assert_eq!(lines[2], "granularity=per-process");
    assert_eq!(lines[6], "io_volume=200");
    assert_eq!(text, report.to_text().unwrap());
}

#[test]
fn test_reset_zeroes_counters_and_keeps_graph() {
    let mut model = PredictionModel::init(ModelSettings::per_process(2, 4), FixedCallStack::default());
    feed(&mut model, 3, &[1, 2, 1, 2]);
    let nodes = model.scope().node_count();

    model.results_reset();
    let report = model.report();
    assert_eq!(report.io_count, 0);
    assert_eq!(report.io_volume, 0);
    assert_eq!(report.mru_correct_prediction_count, 0);
    assert_eq!(report.call_stack_instrumentation_count, 0);
    assert_eq!(report.context_size, 2);
    assert_eq!(model.scope().node_count(), nodes);

    // Learned transitions survive: [1,2] -> [2,1] is predicted straight away.
    feed(&mut model, 3, &[1]);
    assert_eq!(model.report().mru_correct_prediction_count, 1);
}

#[test]
fn test_finalize_returns_final_report() {
    let mut model = PredictionModel::init(ModelSettings::default(), FixedCallStack::default());
    feed(&mut model, 1, &[9, 9, 9]);
    let report = model.finalize();
    assert_eq!(report.io_count, 3);
    assert_eq!(report.context_size, 16);
    assert!(report.model_memory_footprint > 0);
    assert!(report.mru_accuracy() > 0.0);
}

#[test]
fn test_report_json_uses_report_keys() {
    let model = PredictionModel::init(ModelSettings::default(), FixedCallStack::default());
    let json = model.report().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in REPORT_KEYS {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}

// ---------------------------------------------------------------------------
// Debug trace
// ---------------------------------------------------------------------------

#[test]
fn test_debug_line_format() {
    let mut model = PredictionModel::init(ModelSettings::per_process(2, 4), FixedCallStack::default());
    let mut sink: Vec<u8> = Vec::new();
    let event = IoEvent::read(3, 10).at(1234);
    model
        .on_io_with_call_stack(&event, CallStackId(42), Some(&mut sink as &mut dyn Write))
        .unwrap();

    let line = String::from_utf8(sink).unwrap();
    let expected = format!(
        "timestamp=1234, io_call_stack=42, io_context={}, mru_next_context=0, mfu_next_context=0\n",
        h(&[0, 42])
    );
    assert_eq!(line, expected);
}

#[test]
fn test_failing_debug_sink_still_updates_model() {
    let mut model = PredictionModel::init(ModelSettings::default(), FixedCallStack::default());
    let mut sink = FailingSink;
    let result = model.on_io_with_call_stack(
        &IoEvent::read(1, 10),
        CallStackId(1),
        Some(&mut sink as &mut dyn Write),
    );

    assert!(matches!(result, Err(ModelError::DebugSink(_))));
    assert_eq!(model.report().io_count, 1);
    assert_eq!(model.scope().node_count(), 1);
}
