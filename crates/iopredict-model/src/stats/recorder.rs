//! StatsRecorder: counters folded in on every I/O.

use std::time::Instant;

use serde::Serialize;

use iopredict_core::config::ModelSettings;
use iopredict_core::types::OpKind;

use super::Report;
use crate::accounting::Hits;

/// Count, volume, and time of correct predictions for one heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitCounters {
    pub count: u64,
    pub volume: u64,
    pub io_time_ns: u64,
}

impl HitCounters {
    fn record(&mut self, length: u64, duration_ns: u64) {
        self.count = self.count.wrapping_add(1);
        self.volume = self.volume.wrapping_add(length);
        self.io_time_ns = self.io_time_ns.wrapping_add(duration_ns);
    }
}

/// Aggregate counters for one model instance.
///
/// Inputs are accepted as opaque counters: arithmetic wraps rather than
/// aborting on absurd lengths or durations.
#[derive(Debug, Clone, Serialize)]
pub struct StatsRecorder {
    #[serde(skip)]
    app_start: Instant,
    pub io_count: u64,
    pub io_time_ns: u64,
    pub read_volume: u64,
    pub write_volume: u64,
    pub mru: HitCounters,
    pub mfu: HitCounters,
    pub call_stack_instrumentation_count: u64,
    pub call_stack_instrumentation_time_ns: u64,
    pub model_prediction_time_ns: u64,
    /// Largest memory footprint sampled so far.
    pub memory_high_water_mark: u64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self {
            app_start: Instant::now(),
            io_count: 0,
            io_time_ns: 0,
            read_volume: 0,
            write_volume: 0,
            mru: HitCounters::default(),
            mfu: HitCounters::default(),
            call_stack_instrumentation_count: 0,
            call_stack_instrumentation_time_ns: 0,
            model_prediction_time_ns: 0,
            memory_high_water_mark: 0,
        }
    }

    /// Count one I/O. Only reads and writes contribute volume.
    pub fn record_io(&mut self, op: OpKind, length: u64, duration_ns: u64) {
        self.io_count = self.io_count.wrapping_add(1);
        self.io_time_ns = self.io_time_ns.wrapping_add(duration_ns);
        match op {
            OpKind::Read => self.read_volume = self.read_volume.wrapping_add(length),
            OpKind::Write => self.write_volume = self.write_volume.wrapping_add(length),
            OpKind::Open | OpKind::Close => {}
        }
    }

    pub fn record_hits(&mut self, hits: Hits, length: u64, duration_ns: u64) {
        if hits.mru {
            self.mru.record(length, duration_ns);
        }
        if hits.mfu {
            self.mfu.record(length, duration_ns);
        }
    }

    /// Count one call-stack capture and the time it took.
    pub fn record_instrumentation(&mut self, elapsed_ns: u64) {
        self.call_stack_instrumentation_count =
            self.call_stack_instrumentation_count.wrapping_add(1);
        self.call_stack_instrumentation_time_ns = self
            .call_stack_instrumentation_time_ns
            .wrapping_add(elapsed_ns);
    }

    pub fn record_model_time(&mut self, elapsed_ns: u64) {
        self.model_prediction_time_ns = self.model_prediction_time_ns.wrapping_add(elapsed_ns);
    }

    /// Raise the high-water mark to `bytes` if larger.
    pub fn sample_footprint(&mut self, bytes: u64) {
        self.memory_high_water_mark = self.memory_high_water_mark.max(bytes);
    }

    /// Read plus write volume.
    pub fn io_volume(&self) -> u64 {
        self.read_volume.wrapping_add(self.write_volume)
    }

    /// Nanoseconds since `new` or the last `reset`.
    pub fn app_duration_ns(&self) -> u64 {
        u64::try_from(self.app_start.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Zero every counter and restart the application clock.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Snapshot as the fixed report, with `current_footprint` folded into the high-water mark.
    pub fn report(&self, settings: &ModelSettings, current_footprint: u64) -> Report {
        Report {
            context_size: settings.context_size,
            call_stack_depth: settings.call_stack_depth,
            granularity: settings.granularity.name().to_string(),
            overall_app_duration: self.app_duration_ns(),
            io_time_ns: self.io_time_ns,
            io_count: self.io_count,
            io_volume: self.io_volume(),
            read_volume: self.read_volume,
            write_volume: self.write_volume,
            mru_correct_prediction_count: self.mru.count,
            mru_correct_prediction_volume: self.mru.volume,
            mru_correct_prediction_io_time: self.mru.io_time_ns,
            mfu_correct_prediction_count: self.mfu.count,
            mfu_correct_prediction_volume: self.mfu.volume,
            mfu_correct_prediction_io_time: self.mfu.io_time_ns,
            call_stack_instrumentation_count: self.call_stack_instrumentation_count,
            call_stack_instrumentation_time_ns: self.call_stack_instrumentation_time_ns,
            model_prediction_time_ns: self.model_prediction_time_ns,
            model_memory_footprint: self.memory_high_water_mark.max(current_footprint),
        }
    }
}

impl Default for StatsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
