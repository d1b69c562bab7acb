//! Prediction model configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::{ColdStartGuard, Granularity, NodeSeed};

/// Configuration for the prediction model.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of call sites per context. Default: 16.
    pub context_size: Option<u32>,
    /// Frames captured per call stack. Default: 16.
    pub call_stack_depth: Option<u32>,
    /// Graph scope. Default: process.
    pub granularity: Option<Granularity>,
    /// Override of the MRU cold-start guard. Default: depends on granularity.
    pub cold_start_guard: Option<ColdStartGuard>,
    /// Override of the fresh-node seed. Default: depends on granularity.
    pub node_seed: Option<NodeSeed>,
    /// Hash seed for contexts and call stacks. Default: 12345678.
    pub hash_seed: Option<u64>,
}

impl ModelConfig {
    /// Returns the effective context size, defaulting to 16.
    pub fn effective_context_size(&self) -> u32 {
        self.context_size.unwrap_or(constants::DEFAULT_CONTEXT_SIZE)
    }

    /// Returns the effective call-stack depth, defaulting to 16.
    pub fn effective_call_stack_depth(&self) -> u32 {
        self.call_stack_depth
            .unwrap_or(constants::DEFAULT_CALL_STACK_DEPTH)
    }

    /// Returns the effective granularity, defaulting to per-process.
    pub fn effective_granularity(&self) -> Granularity {
        self.granularity.unwrap_or_default()
    }

    /// Returns the effective cold-start guard for the effective granularity.
    pub fn effective_cold_start_guard(&self) -> ColdStartGuard {
        self.cold_start_guard
            .unwrap_or_else(|| self.effective_granularity().default_cold_start_guard())
    }

    /// Returns the effective node seed for the effective granularity.
    pub fn effective_node_seed(&self) -> NodeSeed {
        self.node_seed
            .unwrap_or_else(|| self.effective_granularity().default_node_seed())
    }

    /// Returns the effective hash seed.
    pub fn effective_hash_seed(&self) -> u64 {
        self.hash_seed.unwrap_or(constants::HASH_SEED)
    }
}
