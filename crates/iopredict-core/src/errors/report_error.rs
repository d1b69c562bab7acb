//! Report serialization errors.

use super::error_code::{self, ErrorCode};

/// Errors that can occur while writing the final report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("report serialization failed: {message}")]
    Serialization { message: String },
}

impl ErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
