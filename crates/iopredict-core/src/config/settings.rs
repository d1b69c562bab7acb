//! Resolved model settings handed to `PredictionModel::init`.

use serde::{Deserialize, Serialize};

use super::ModelConfig;
use crate::constants;
use crate::types::{ColdStartGuard, Granularity, NodeSeed};

/// Fully resolved, plain-valued model parameters.
///
/// `context_size` is trusted as given; clamping happens while loading
/// configuration, upstream of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub context_size: u32,
    pub call_stack_depth: u32,
    pub granularity: Granularity,
    pub cold_start_guard: ColdStartGuard,
    pub node_seed: NodeSeed,
    pub hash_seed: u64,
}

impl ModelSettings {
    /// Settings for `granularity` with its historical policies and the default seed.
    pub fn new(granularity: Granularity, context_size: u32, call_stack_depth: u32) -> Self {
        Self {
            context_size,
            call_stack_depth,
            granularity,
            cold_start_guard: granularity.default_cold_start_guard(),
            node_seed: granularity.default_node_seed(),
            hash_seed: constants::HASH_SEED,
        }
    }

    /// Process-wide settings.
    pub fn per_process(context_size: u32, call_stack_depth: u32) -> Self {
        Self::new(Granularity::Process, context_size, call_stack_depth)
    }

    /// Per-handle settings.
    pub fn per_handle(context_size: u32, call_stack_depth: u32) -> Self {
        Self::new(Granularity::Handle, context_size, call_stack_depth)
    }

    pub fn with_cold_start_guard(mut self, guard: ColdStartGuard) -> Self {
        self.cold_start_guard = guard;
        self
    }

    pub fn with_node_seed(mut self, seed: NodeSeed) -> Self {
        self.node_seed = seed;
        self
    }

    pub fn with_hash_seed(mut self, seed: u64) -> Self {
        self.hash_seed = seed;
        self
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::per_process(
            constants::DEFAULT_CONTEXT_SIZE,
            constants::DEFAULT_CALL_STACK_DEPTH,
        )
    }
}

impl From<&ModelConfig> for ModelSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            context_size: config.effective_context_size(),
            call_stack_depth: config.effective_call_stack_depth(),
            granularity: config.effective_granularity(),
            cold_start_guard: config.effective_cold_start_guard(),
            node_seed: config.effective_node_seed(),
            hash_seed: config.effective_hash_seed(),
        }
    }
}
