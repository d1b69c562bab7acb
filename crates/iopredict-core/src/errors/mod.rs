//! Error handling for iopredict.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod model_error;
pub mod report_error;
pub mod tracer_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use model_error::ModelError;
pub use report_error::ReportError;
pub use tracer_error::TracerError;
