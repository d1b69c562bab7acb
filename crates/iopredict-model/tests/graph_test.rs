//! PredictionGraph and GraphNode tests.

use iopredict_core::types::{ContextHash, NodeSeed};
use iopredict_model::{GraphNode, MfuEdge, PredictionGraph};

const A: ContextHash = ContextHash(0xA);
const B: ContextHash = ContextHash(0xB);
const C: ContextHash = ContextHash(0xC);

fn node_with_edges(edges: &[(ContextHash, u64)]) -> GraphNode {
    let mut node = GraphNode::new(ContextHash::UNSET);
    for &(successor, weight) in edges {
        for _ in 0..weight {
            node.update_edge(successor);
        }
    }
    node
}

#[test]
fn test_fresh_node_seed_unset() {
    let mut graph = PredictionGraph::new(NodeSeed::Unset);
    let node = graph.lookup_or_create(A);
    assert_eq!(node.mru_successor, ContextHash::UNSET);
    assert!(node.mfu_edges.is_empty());
}

#[test]
fn test_fresh_node_seed_self_loop() {
    let mut graph = PredictionGraph::new(NodeSeed::SelfLoop);
    let node = graph.lookup_or_create(A);
    assert_eq!(node.mru_successor, A);
    let prediction = graph.predict(A).unwrap();
    assert_eq!(prediction.mru, A);
    assert_eq!(prediction.mfu, A);
}

#[test]
fn test_lookup_or_create_returns_existing() {
    let mut graph = PredictionGraph::new(NodeSeed::Unset);
    graph.lookup_or_create(A).update_edge(B);
    let node = graph.lookup_or_create(A);
    assert_eq!(node.mru_successor, B);
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_update_edge_increments_existing_successor() {
    let mut node = GraphNode::new(ContextHash::UNSET);
    node.update_edge(B);
    node.update_edge(C);
    node.update_edge(B);
    assert_eq!(node.mru_successor, B);
    assert_eq!(
        node.mfu_edges.as_slice(),
        &[
            MfuEdge { successor: B, weight: 2 },
            MfuEdge { successor: C, weight: 1 },
        ]
    );
    assert_eq!(node.total_weight(), 3);
}

#[test]
fn test_mfu_tie_goes_to_first_edge() {
    let node = node_with_edges(&[(A, 3), (B, 3)]);
    assert_eq!(node.predict().mfu, A);
}

#[test]
fn test_mfu_strictly_heavier_later_edge_wins() {
    let node = node_with_edges(&[(A, 3), (B, 4)]);
    assert_eq!(node.predict().mfu, B);
}

#[test]
fn test_mru_and_mfu_can_disagree() {
    let node = node_with_edges(&[(A, 5), (B, 1)]);
    let prediction = node.predict();
    assert_eq!(prediction.mru, B);
    assert_eq!(prediction.mfu, A);
}

#[test]
fn test_empty_edges_mfu_falls_back_to_mru() {
    let node = GraphNode::new(ContextHash::UNSET);
    let prediction = node.predict();
    assert_eq!(prediction.mfu, ContextHash::UNSET);
    assert_eq!(prediction.mfu, prediction.mru);

    let node = GraphNode::new(C);
    assert_eq!(node.predict().mfu, C);
}

#[test]
fn test_graph_update_edge_on_unknown_node_is_ignored() {
    let mut graph = PredictionGraph::new(NodeSeed::Unset);
    graph.update_edge(A, B);
    assert!(graph.is_empty());
    assert_eq!(graph.predict(A), None);
}

#[test]
fn test_edge_count_and_heap_bytes_grow() {
    let mut graph = PredictionGraph::new(NodeSeed::Unset);
    graph.lookup_or_create(A);
    let one_node = graph.heap_bytes();
    assert!(one_node > 0);
    for successor in 1..=10u64 {
        graph.update_edge(A, ContextHash(successor));
    }
    assert_eq!(graph.edge_count(), 10);
    // Ten edges outgrow the inline edge storage.
    assert!(graph.heap_bytes() > one_node);
}
