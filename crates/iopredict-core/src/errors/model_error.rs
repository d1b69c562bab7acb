//! Prediction model errors.

use super::error_code::{self, ErrorCode};

/// Errors surfaced by the per-I/O entry point.
///
/// The model itself never rejects an event; the only failure is the
/// caller-provided debug sink refusing a write, after the model state
/// has already been updated.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("debug sink write failed: {0}")]
    DebugSink(#[source] std::io::Error),
}

impl ErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DebugSink(_) => error_code::DEBUG_SINK_ERROR,
        }
    }
}
