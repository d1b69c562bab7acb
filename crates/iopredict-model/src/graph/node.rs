//! Graph nodes and the two prediction heuristics.

use serde::{Deserialize, Serialize};

use iopredict_core::collections::SmallVec4;
use iopredict_core::types::ContextHash;

/// One learned transition and how many times it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfuEdge {
    pub successor: ContextHash,
    pub weight: u64,
}

/// Next-context predictions of both heuristics. `UNSET` means "no prediction".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub mru: ContextHash,
    pub mfu: ContextHash,
}

/// A context and what has been seen to follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Successor observed most recently.
    pub mru_successor: ContextHash,
    /// Distinct successors in first-seen order with their weights.
    pub mfu_edges: SmallVec4<MfuEdge>,
}

impl GraphNode {
    pub fn new(mru_successor: ContextHash) -> Self {
        Self {
            mru_successor,
            mfu_edges: SmallVec4::new(),
        }
    }

    /// Record that `next` followed this context.
    ///
    /// The MRU successor is overwritten; the MFU edge to `next` is incremented
    /// or appended with weight 1. Successors stay unique.
    pub fn update_edge(&mut self, next: ContextHash) {
        self.mru_successor = next;
        match self.mfu_edges.iter_mut().find(|e| e.successor == next) {
            Some(edge) => edge.weight += 1,
            None => self.mfu_edges.push(MfuEdge {
                successor: next,
                weight: 1,
            }),
        }
    }

    /// Predict the next context with both heuristics.
    ///
    /// MFU picks the heaviest edge; on equal weight the edge created first
    /// wins. With no edges MFU falls back to the MRU successor.
    pub fn predict(&self) -> Prediction {
        Prediction {
            mru: self.mru_successor,
            mfu: self.mfu_successor(),
        }
    }

    fn mfu_successor(&self) -> ContextHash {
        if self.mfu_edges.is_empty() {
            return self.mru_successor;
        }
        let mut best = ContextHash::UNSET;
        let mut best_weight = 0;
        for edge in &self.mfu_edges {
            if edge.weight > best_weight {
                best_weight = edge.weight;
                best = edge.successor;
            }
        }
        best
    }

    /// Sum of all edge weights: the number of recorded transitions out of this node.
    pub fn total_weight(&self) -> u64 {
        self.mfu_edges.iter().map(|e| e.weight).sum()
    }

    /// Heap bytes of the edge list once it outgrows its inline capacity.
    pub fn spilled_edge_bytes(&self) -> usize {
        if self.mfu_edges.spilled() {
            self.mfu_edges.capacity() * std::mem::size_of::<MfuEdge>()
        } else {
            0
        }
    }
}
