//! The end-of-run report: fixed `key=value` lines consumed by evaluation scripts.

use std::io::Write;

use serde::{Deserialize, Serialize};

use iopredict_core::errors::ReportError;

/// Snapshot of a model's statistics, field order matching the report lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub context_size: u32,
    pub call_stack_depth: u32,
    pub granularity: String,
    pub overall_app_duration: u64,
    pub io_time_ns: u64,
    pub io_count: u64,
    pub io_volume: u64,
    pub read_volume: u64,
    pub write_volume: u64,
    pub mru_correct_prediction_count: u64,
    pub mru_correct_prediction_volume: u64,
    pub mru_correct_prediction_io_time: u64,
    pub mfu_correct_prediction_count: u64,
    pub mfu_correct_prediction_volume: u64,
    pub mfu_correct_prediction_io_time: u64,
    pub call_stack_instrumentation_count: u64,
    pub call_stack_instrumentation_time_ns: u64,
    pub model_prediction_time_ns: u64,
    pub model_memory_footprint: u64,
}

impl Report {
    /// Write one `key=value` line per field, in order, and flush.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<(), ReportError> {
        writeln!(sink, "context_size={}", self.context_size)?;
        writeln!(sink, "call_stack_depth={}", self.call_stack_depth)?;
        writeln!(sink, "granularity={}", self.granularity)?;
        writeln!(sink, "overall_app_duration={}", self.overall_app_duration)?;
        writeln!(sink, "io_time_ns={}", self.io_time_ns)?;
        writeln!(sink, "io_count={}", self.io_count)?;
        writeln!(sink, "io_volume={}", self.io_volume)?;
        writeln!(sink, "read_volume={}", self.read_volume)?;
        writeln!(sink, "write_volume={}", self.write_volume)?;
        writeln!(
            sink,
            "mru_correct_prediction_count={}",
            self.mru_correct_prediction_count
        )?;
        writeln!(
            sink,
            "mru_correct_prediction_volume={}",
            self.mru_correct_prediction_volume
        )?;
        writeln!(
            sink,
            "mru_correct_prediction_io_time={}",
            self.mru_correct_prediction_io_time
        )?;
        writeln!(
            sink,
            "mfu_correct_prediction_count={}",
            self.mfu_correct_prediction_count
        )?;
        writeln!(
            sink,
            "mfu_correct_prediction_volume={}",
            self.mfu_correct_prediction_volume
        )?;
        writeln!(
            sink,
            "mfu_correct_prediction_io_time={}",
            self.mfu_correct_prediction_io_time
        )?;
        writeln!(
            sink,
            "call_stack_instrumentation_count={}",
            self.call_stack_instrumentation_count
        )?;
        writeln!(
            sink,
            "call_stack_instrumentation_time_ns={}",
            self.call_stack_instrumentation_time_ns
        )?;
        writeln!(sink, "model_prediction_time_ns={}", self.model_prediction_time_ns)?;
        writeln!(sink, "model_memory_footprint={}", self.model_memory_footprint)?;
        sink.flush()?;
        Ok(())
    }

    /// Render the report lines into a string.
    pub fn to_text(&self) -> Result<String, ReportError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| ReportError::Serialization {
            message: e.to_string(),
        })
    }

    /// Serialize as a JSON object with the same keys.
    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialization {
            message: e.to_string(),
        })
    }

    /// MRU hit rate over all I/Os, 0.0 with no I/O.
    pub fn mru_accuracy(&self) -> f64 {
        ratio(self.mru_correct_prediction_count, self.io_count)
    }

    /// MFU hit rate over all I/Os, 0.0 with no I/O.
    pub fn mfu_accuracy(&self) -> f64 {
        ratio(self.mfu_correct_prediction_count, self.io_count)
    }
}

fn ratio(hits: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    hits as f64 / total as f64
}
