//! # iopredict-core
//!
//! Foundation crate for the iopredict call-stack prediction model.
//! Defines identifiers, event types, hashing, errors, config, traits, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod collections;
pub mod config;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{ModelSettings, PredictConfig};
pub use errors::{ConfigError, ErrorCode, ModelError, ReportError, TracerError};
pub use traits::CallStackSource;
pub use types::{
    CallStackId, ColdStartGuard, ContextHash, Granularity, Handle, IoEvent, NodeSeed, OpKind,
};
