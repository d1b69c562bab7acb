//! Host tracer errors.
//! Aggregates subsystem errors via `From` conversions.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, ModelError, ReportError};

/// Errors raised by the process-level tracer glue.
#[derive(Debug, thiserror::Error)]
pub enum TracerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("cannot prepare output {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("address map {path} unreadable: {source}")]
    AddressMap {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model lock poisoned by a panicking thread")]
    LockPoisoned,
}

impl ErrorCode for TracerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Model(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Output { .. } => error_code::OUTPUT_ERROR,
            Self::AddressMap { .. } => error_code::ADDRESS_MAP_ERROR,
            Self::LockPoisoned => error_code::LOCK_POISONED,
        }
    }
}
