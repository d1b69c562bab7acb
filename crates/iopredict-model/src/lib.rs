//! # iopredict-model
//!
//! Online, per-process model of I/O call-site sequences used to drive predictive prefetch.
//!
//! ## Per-I/O update
//!
//! | Step | Component |
//! |------|-----------|
//! | Fold the call site into the context window and hash it | [`ContextTracker`] |
//! | Score the previous MRU/MFU predictions against the new context | [`accounting`] |
//! | Record the transition on the previous node, predict from the current one | [`PredictionGraph`] |
//! | Fold volumes, hits, and timings | [`StatsRecorder`] |
//!
//! ## Granularity
//!
//! A [`ScopeStore`] holds either one process-wide graph or one graph per open
//! file handle; handle graphs are discarded when the handle closes.

pub mod accounting;
pub mod context;
pub mod graph;
pub mod model;
pub mod scope;
pub mod stats;

pub use accounting::Hits;
pub use context::ContextTracker;
pub use graph::{GraphNode, MfuEdge, Prediction, PredictionGraph};
pub use model::PredictionModel;
pub use scope::{HandleTable, ScopeEntry, ScopeStore, StepOutcome};
pub use stats::{Report, StatsRecorder};
