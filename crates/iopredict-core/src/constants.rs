//! Shared constants for the iopredict model.

/// iopredict version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of call sites folded into one context.
pub const DEFAULT_CONTEXT_SIZE: u32 = 16;

/// Default number of frames captured per call stack.
pub const DEFAULT_CALL_STACK_DEPTH: u32 = 16;

/// Smallest accepted context size.
pub const MIN_CONTEXT_SIZE: u32 = 1;

/// Largest accepted context size. Larger requests are clamped.
pub const MAX_CONTEXT_SIZE: u32 = 1024;

/// Seed for context and call-stack hashing.
pub const HASH_SEED: u64 = 12345678;

/// Prefix of the report directory and module label.
pub const MODULE_PREFIX: &str = "iopredict";

/// Environment variable names.
pub mod env {
    pub const LOG: &str = "IOPREDICT_LOG";
    pub const CONTEXT_SIZE: &str = "IOPREDICT_CONTEXT_SIZE";
    pub const CALL_STACK_DEPTH: &str = "IOPREDICT_CALL_STACK_DEPTH";
    pub const GRANULARITY: &str = "IOPREDICT_GRANULARITY";
    pub const DUMP_FOLDER: &str = "IOPREDICT_DUMP_FOLDER";
    pub const EXPERIMENT_NAME: &str = "IOPREDICT_EXPERIMENT_NAME";
    pub const DEBUG_MODEL: &str = "IOPREDICT_DEBUG_MODEL";
    pub const IGNORE_NODE: &str = "IOPREDICT_IGNORE_NODE";

    /// Every variable read by [`crate::config::PredictConfig::load`].
    pub const ALL: [&str; 7] = [
        CONTEXT_SIZE,
        CALL_STACK_DEPTH,
        GRANULARITY,
        DUMP_FOLDER,
        EXPERIMENT_NAME,
        DEBUG_MODEL,
        IGNORE_NODE,
    ];
}
