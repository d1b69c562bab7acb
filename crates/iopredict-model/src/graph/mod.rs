//! PredictionGraph: context hash → node with MRU successor and weighted MFU successors.

pub mod node;

pub use node::{GraphNode, MfuEdge, Prediction};

use iopredict_core::collections::FxHashMap;
use iopredict_core::types::{ContextHash, NodeSeed};

/// Graph of observed context transitions for one scope entry.
///
/// Nodes are only ever added; the whole graph is dropped at once when its
/// scope entry ends.
#[derive(Debug, Clone)]
pub struct PredictionGraph {
    nodes: FxHashMap<ContextHash, GraphNode>,
    seed: NodeSeed,
}

impl PredictionGraph {
    pub fn new(seed: NodeSeed) -> Self {
        Self {
            nodes: FxHashMap::default(),
            seed,
        }
    }

    /// Return the node for `hash`, inserting a fresh one if absent.
    ///
    /// A fresh node's MRU successor is unset or points at itself, depending on
    /// the graph's [`NodeSeed`].
    pub fn lookup_or_create(&mut self, hash: ContextHash) -> &mut GraphNode {
        let seed = self.seed;
        self.nodes.entry(hash).or_insert_with(|| match seed {
            NodeSeed::Unset => GraphNode::new(ContextHash::UNSET),
            NodeSeed::SelfLoop => GraphNode::new(hash),
        })
    }

    /// Record that `to` followed `from`. Does nothing if `from` is unknown.
    pub fn update_edge(&mut self, from: ContextHash, to: ContextHash) {
        if let Some(node) = self.nodes.get_mut(&from) {
            node.update_edge(to);
        }
    }

    /// MRU/MFU prediction from `hash`, if the node exists.
    pub fn predict(&self, hash: ContextHash) -> Option<Prediction> {
        self.nodes.get(&hash).map(GraphNode::predict)
    }

    pub fn node(&self, hash: ContextHash) -> Option<&GraphNode> {
        self.nodes.get(&hash)
    }

    pub fn contains(&self, hash: ContextHash) -> bool {
        self.nodes.contains_key(&hash)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of distinct successor edges across all nodes.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.mfu_edges.len()).sum()
    }

    pub fn seed(&self) -> NodeSeed {
        self.seed
    }

    /// Estimated bytes held by the graph: one map slot per node plus spilled edge lists.
    pub fn heap_bytes(&self) -> usize {
        let slot = std::mem::size_of::<(ContextHash, GraphNode)>();
        self.nodes
            .values()
            .map(|n| slot + n.spilled_edge_bytes())
            .sum()
    }
}
