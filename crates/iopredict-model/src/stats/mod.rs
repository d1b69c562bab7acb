//! Accuracy, volume, timing, and memory-overhead statistics.

pub mod recorder;
pub mod report;

pub use recorder::StatsRecorder;
pub use report::Report;
