//! One independent prediction state: a context window, its graph, and the pending prediction.

use serde::{Deserialize, Serialize};

use iopredict_core::config::ModelSettings;
use iopredict_core::types::{CallStackId, ColdStartGuard, ContextHash};

use crate::accounting::{self, Hits};
use crate::context::ContextTracker;
use crate::graph::{Prediction, PredictionGraph};

/// Result of folding one I/O into a scope entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub call_stack: CallStackId,
    /// Context hash of this I/O.
    pub context: ContextHash,
    /// Whether the predictions made on the previous I/O were right.
    pub hits: Hits,
    /// Predictions for the next I/O.
    pub prediction: Prediction,
}

/// Context, graph, and prediction bookkeeping for the process or one handle.
#[derive(Debug, Clone)]
pub struct ScopeEntry {
    context: ContextTracker,
    graph: PredictionGraph,
    pending: Prediction,
    previous_call_stack: CallStackId,
    /// Key of the node reached by the previous I/O.
    previous_node: Option<ContextHash>,
}

impl ScopeEntry {
    pub fn new(settings: &ModelSettings) -> Self {
        Self {
            context: ContextTracker::new(settings.context_size, settings.hash_seed),
            graph: PredictionGraph::new(settings.node_seed),
            pending: Prediction::default(),
            previous_call_stack: CallStackId::UNSET,
            previous_node: None,
        }
    }

    /// Fold one call site into this entry.
    ///
    /// Order matters: the pending prediction is scored before the previous
    /// node learns the transition, and the next prediction is made after.
    pub fn step(&mut self, call_stack: CallStackId, guard: ColdStartGuard) -> StepOutcome {
        let context = self.context.observe(call_stack);

        let hits = accounting::check(
            self.pending,
            self.previous_call_stack,
            context,
            call_stack,
            guard,
        );

        if let Some(previous) = self.previous_node {
            self.graph.update_edge(previous, context);
        }

        let prediction = self.graph.lookup_or_create(context).predict();

        self.pending = prediction;
        self.previous_call_stack = call_stack;
        self.previous_node = Some(context);

        StepOutcome {
            call_stack,
            context,
            hits,
            prediction,
        }
    }

    pub fn context(&self) -> &ContextTracker {
        &self.context
    }

    pub fn graph(&self) -> &PredictionGraph {
        &self.graph
    }

    /// Predictions made on the last I/O, awaiting the next one.
    pub fn pending(&self) -> Prediction {
        self.pending
    }

    pub fn previous_call_stack(&self) -> CallStackId {
        self.previous_call_stack
    }

    /// Heap bytes owned by the context window and the graph.
    pub fn heap_bytes(&self) -> usize {
        self.context.heap_bytes() + self.graph.heap_bytes()
    }
}
