//! ErrorCode trait for stable, machine-readable error identifiers.

/// Every error enum implements this to provide a structured error code string
/// that host tooling can match on without parsing messages.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DEBUG_SINK_ERROR: &str = "DEBUG_SINK_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const OUTPUT_ERROR: &str = "OUTPUT_ERROR";
pub const LOCK_POISONED: &str = "LOCK_POISONED";
pub const ADDRESS_MAP_ERROR: &str = "ADDRESS_MAP_ERROR";
