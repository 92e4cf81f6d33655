//! Depth-first traversals over a [`DirectedGraph`].
//!
//! All traversals are iterative (no recursion depth limit for deeply nested
//! programs), visit successors in edge insertion order, and never revisit a
//! node, so they terminate on cyclic graphs.

use crate::utils::graph::{DirectedGraph, NodeId};

/// Walks the graph depth-first from `start`, calling `on_edge` for every edge
/// leaving a visited node and `on_finish` when a node's successors are exhausted.
fn walk<N, E>(
    graph: &DirectedGraph<N, E>,
    start: NodeId,
    mut on_edge: impl FnMut(NodeId, NodeId),
    mut on_finish: impl FnMut(NodeId),
) {
    if !graph.contains_node(start) {
        return;
    }

    let mut seen = vec![false; graph.node_count()];
    let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
    seen[start.index()] = true;

    while let Some(top) = stack.last_mut() {
        let (node, next) = *top;
        match graph.successors(node).nth(next) {
            Some(succ) => {
                top.1 += 1;
                on_edge(node, succ);
                if !seen[succ.index()] {
                    seen[succ.index()] = true;
                    stack.push((succ, 0));
                }
            }
            None => {
                stack.pop();
                on_finish(node);
            }
        }
    }
}

/// Returns every edge reachable from `start`, in depth-first discovery order.
///
/// An edge is reported when its source is being explored, immediately before
/// the traversal descends into its (not yet seen) target. Edges into already
/// seen nodes, such as loop back-edges, are reported but not followed.
#[must_use]
pub fn dfs_edges<N, E>(graph: &DirectedGraph<N, E>, start: NodeId) -> Vec<(NodeId, NodeId)> {
    let mut edges = Vec::with_capacity(graph.edge_count());
    walk(graph, start, |from, to| edges.push((from, to)), |_| {});
    edges
}

/// Returns the nodes reachable from `start` in depth-first postorder.
#[must_use]
pub fn postorder<N, E>(graph: &DirectedGraph<N, E>, start: NodeId) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(graph.node_count());
    walk(graph, start, |_, _| {}, |node| order.push(node));
    order
}

/// Returns the nodes reachable from `start` in reverse postorder.
///
/// For forward data flow problems this visits every node before its
/// successors, except along back-edges.
#[must_use]
pub fn reverse_postorder<N, E>(graph: &DirectedGraph<N, E>, start: NodeId) -> Vec<NodeId> {
    let mut order = postorder(graph, start);
    order.reverse();
    order
}

/// Returns a per-node flag telling whether the node is reachable from `start`.
#[must_use]
pub fn reachable_from<N, E>(graph: &DirectedGraph<N, E>, start: NodeId) -> Vec<bool> {
    let mut reached = vec![false; graph.node_count()];
    for node in postorder(graph, start) {
        reached[node.index()] = true;
    }
    reached
}

/// Returns a per-node flag telling whether `target` is reachable from the node.
#[must_use]
pub fn reaching_to<N, E>(graph: &DirectedGraph<N, E>, target: NodeId) -> Vec<bool> {
    let mut reached = vec![false; graph.node_count()];
    if !graph.contains_node(target) {
        return reached;
    }

    let mut stack = vec![target];
    reached[target.index()] = true;
    while let Some(node) = stack.pop() {
        for pred in graph.predecessors(node) {
            if !reached[pred.index()] {
                reached[pred.index()] = true;
                stack.push(pred);
            }
        }
    }
    reached
}
