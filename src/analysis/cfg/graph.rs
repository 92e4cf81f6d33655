//! Control Flow Graph implementation.
//!
//! This module provides the [`ControlFlowGraph`] structure that wraps labelled
//! program points in a [`DirectedGraph`] and exposes the label-based view used
//! by analyses and reports.

use std::fmt;

use crate::{
    analysis::cfg::{CfgEdgeKind, CfgNode, Label},
    utils::graph::{traversal, DirectedGraph, NodeId},
};

/// A control flow graph of a WHILE program.
///
/// The graph has a single entry (the first statement or test of the program)
/// and a single synthetic exit node, reachable from every node. It is
/// immutable once built: analyses keep their own per-node state indexed by
/// [`NodeId`].
///
/// Nodes created by [`crate::analysis::CfgBuilder`] are stored in label order,
/// so `Label::Stmt(n)` is `NodeId` `n - 1` and the exit node is last.
///
/// # Examples
///
/// ```rust
/// use whileflow::{
///     analysis::{CfgBuilder, Label},
///     syntax::{BinaryOperator, Expression, Statement},
/// };
///
/// // x := 0; while (x < 10) { x := x + 1 }
/// let program = Statement::sequence(vec![
///     Statement::assign("x", Expression::constant(0)),
///     Statement::while_loop(
///         Expression::binary(BinaryOperator::Lt, Expression::var("x"), Expression::constant(10)),
///         Statement::assign(
///             "x",
///             Expression::binary(BinaryOperator::Add, Expression::var("x"), Expression::constant(1)),
///         ),
///     ),
/// ]);
///
/// let cfg = CfgBuilder::build(&program)?;
/// assert_eq!(
///     cfg.edges(),
///     vec![
///         (Label::Stmt(1), Label::Stmt(2)),
///         (Label::Stmt(2), Label::Stmt(3)),
///         (Label::Stmt(3), Label::Stmt(2)),
///         (Label::Stmt(2), Label::Exit),
///     ]
/// );
/// # Ok::<(), whileflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    /// The underlying graph
    graph: DirectedGraph<CfgNode, CfgEdgeKind>,
    /// Root of the program
    entry: NodeId,
    /// The synthetic exit node
    exit: NodeId,
    /// Nodes linked to the exit node when the graph was finalized
    exit_labels: Vec<Label>,
}

impl ControlFlowGraph {
    /// Wraps a finished graph.
    pub(crate) fn new(
        graph: DirectedGraph<CfgNode, CfgEdgeKind>,
        entry: NodeId,
        exit: NodeId,
    ) -> Self {
        let exit_labels = graph
            .predecessors(exit)
            .filter_map(|pred| graph.node(pred).map(CfgNode::label))
            .collect();
        Self {
            graph,
            entry,
            exit,
            exit_labels,
        }
    }

    /// Returns the entry node.
    #[must_use]
    pub const fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the synthetic exit node.
    #[must_use]
    pub const fn exit(&self) -> NodeId {
        self.exit
    }

    /// Returns the label of the entry node.
    #[must_use]
    pub fn entry_label(&self) -> Label {
        self.label(self.entry).unwrap_or(Label::Exit)
    }

    /// Returns the labels of the nodes that finish the program, i.e. the
    /// predecessors of the exit node.
    #[must_use]
    pub fn exit_labels(&self) -> &[Label] {
        &self.exit_labels
    }

    /// Returns the underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &DirectedGraph<CfgNode, CfgEdgeKind> {
        &self.graph
    }

    /// Returns the number of nodes, including the exit node.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns a node by identifier.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&CfgNode> {
        self.graph.node(node)
    }

    /// Returns a node by label.
    #[must_use]
    pub fn node_by_label(&self, label: Label) -> Option<&CfgNode> {
        self.node_id(label).and_then(|id| self.graph.node(id))
    }

    /// Returns the identifier of the node carrying `label`.
    #[must_use]
    pub fn node_id(&self, label: Label) -> Option<NodeId> {
        match label {
            Label::Exit => Some(self.exit),
            Label::Stmt(0) => None,
            Label::Stmt(n) => {
                let id = NodeId::new(n as usize - 1);
                match self.graph.node(id) {
                    Some(node) if node.label() == label => Some(id),
                    _ => self
                        .graph
                        .nodes()
                        .find(|(_, node)| node.label() == label)
                        .map(|(id, _)| id),
                }
            }
        }
    }

    /// Returns the label of a node.
    #[must_use]
    pub fn label(&self, node: NodeId) -> Option<Label> {
        self.graph.node(node).map(CfgNode::label)
    }

    /// Iterates over all nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &CfgNode)> + '_ {
        self.graph.nodes()
    }

    /// Iterates over all node identifiers.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_ids()
    }

    /// Iterates over the successors of a node, in construction order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Iterates over the predecessors of a node, in construction order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(node)
    }

    /// Returns the edges reachable from the entry as label pairs.
    ///
    /// Edges are enumerated depth-first from the entry, following successors
    /// in construction order and never revisiting a node, so every edge of a
    /// built graph appears exactly once, back edges included.
    #[must_use]
    pub fn edges(&self) -> Vec<(Label, Label)> {
        traversal::dfs_edges(&self.graph, self.entry)
            .into_iter()
            .filter_map(|(from, to)| Some((self.label(from)?, self.label(to)?)))
            .collect()
    }

    /// Returns every edge with its kind, in construction order.
    #[must_use]
    pub fn edges_with_kind(&self) -> Vec<(Label, Label, CfgEdgeKind)> {
        self.graph
            .edges()
            .filter_map(|(from, to, kind)| Some((self.label(from)?, self.label(to)?, *kind)))
            .collect()
    }

    /// Returns `true` if an edge `from -> to` exists and closes a loop.
    #[must_use]
    pub fn is_back_edge(&self, from: Label, to: Label) -> bool {
        let (Some(source), Some(target)) = (self.node_id(from), self.node_id(to)) else {
            return false;
        };
        self.graph
            .outgoing_edges(source)
            .any(|(succ, kind)| succ == target && kind.is_back_edge())
    }

    /// Returns the nodes reachable from the entry in postorder.
    #[must_use]
    pub fn postorder(&self) -> Vec<NodeId> {
        traversal::postorder(&self.graph, self.entry)
    }

    /// Returns the nodes reachable from the entry in reverse postorder.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        traversal::reverse_postorder(&self.graph, self.entry)
    }

    /// Returns, per node, whether it is reachable from the entry.
    #[must_use]
    pub fn reachable(&self) -> Vec<bool> {
        traversal::reachable_from(&self.graph, self.entry)
    }

    /// Returns, per node, whether the exit is reachable from it.
    #[must_use]
    pub fn reaches_exit(&self) -> Vec<bool> {
        traversal::reaching_to(&self.graph, self.exit)
    }
}

impl fmt::Display for ControlFlowGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, node) in self.graph.nodes() {
            let successors: Vec<String> = self
                .graph
                .successors(id)
                .filter_map(|succ| self.label(succ))
                .map(|label| label.to_string())
                .collect();
            writeln!(f, "{node} -> [{}]", successors.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::cfg::{CfgBuilder, NodePayload},
        test::factories::{book_example, conditional_assignment, increment_loop},
    };

    #[test]
    fn test_book_example_edges() {
        let cfg = CfgBuilder::build(&book_example()).unwrap();
        let s = Label::Stmt;
        assert_eq!(
            cfg.edges(),
            vec![
                (s(1), s(2)),
                (s(2), s(3)),
                (s(3), s(4)),
                (s(4), s(5)),
                (s(5), s(3)),
                (s(3), Label::Exit),
            ]
        );
        assert_eq!(cfg.node_count(), 6);
        assert_eq!(cfg.edge_count(), 6);
        assert_eq!(cfg.exit_labels(), &[s(3)]);
        assert_eq!(cfg.entry_label(), s(1));
    }

    #[test]
    fn test_label_lookup_roundtrip() {
        let cfg = CfgBuilder::build(&book_example()).unwrap();
        for (id, node) in cfg.nodes() {
            assert_eq!(cfg.node_id(node.label()), Some(id));
            assert_eq!(cfg.label(id), Some(node.label()));
        }
        assert_eq!(cfg.node_id(Label::Stmt(0)), None);
        assert_eq!(cfg.node_id(Label::Stmt(99)), None);
        assert_eq!(
            cfg.node_by_label(Label::Exit).map(CfgNode::payload),
            Some(&NodePayload::Exit)
        );
    }

    #[test]
    fn test_back_edges_and_kinds() {
        let cfg = CfgBuilder::build(&increment_loop()).unwrap();
        assert!(cfg.is_back_edge(Label::Stmt(3), Label::Stmt(2)));
        assert!(!cfg.is_back_edge(Label::Stmt(2), Label::Stmt(3)));
        assert!(!cfg.is_back_edge(Label::Stmt(1), Label::Stmt(3)));

        let kinds = cfg.edges_with_kind();
        assert!(kinds.contains(&(Label::Stmt(2), Label::Stmt(3), CfgEdgeKind::ConditionalTrue)));
        assert!(kinds.contains(&(Label::Stmt(2), Label::Exit, CfgEdgeKind::ConditionalFalse)));
        assert!(kinds.contains(&(Label::Stmt(1), Label::Stmt(2), CfgEdgeKind::Sequential)));
    }

    #[test]
    fn test_branches_join_at_exit() {
        let cfg = CfgBuilder::build(&conditional_assignment()).unwrap();
        assert_eq!(cfg.exit_labels(), &[Label::Stmt(2), Label::Stmt(3)]);
        assert_eq!(cfg.predecessors(cfg.exit()).count(), 2);
        assert!(cfg.reachable().iter().all(|&r| r));
        assert!(cfg.reaches_exit().iter().all(|&r| r));
        assert_eq!(cfg.reverse_postorder().first(), Some(&cfg.entry()));
        assert_eq!(cfg.postorder().first(), Some(&cfg.exit()));
    }

    #[test]
    fn test_display_lists_successors() {
        let cfg = CfgBuilder::build(&increment_loop()).unwrap();
        let text = cfg.to_string();
        assert!(text.contains("1: x := 0 -> [2]"));
        assert!(text.contains("2: [x < 10] -> [3, exit]"));
        assert!(text.contains("exit -> []"));
    }
}
