//! Data flow analysis framework trait and direction.
//!
//! This module defines the core abstraction for data flow analyses. Any
//! specific analysis (available expressions, reaching definitions, liveness)
//! implements the [`DataFlowAnalysis`] trait to work with the solver.

use std::fmt;

use crate::{
    analysis::cfg::{CfgNode, ControlFlowGraph, Label},
    analysis::dataflow::lattice::MeetSemiLattice,
    utils::{graph::NodeId, BitSet},
};

/// Direction of data flow analysis.
///
/// The direction determines how information propagates through the CFG
/// and which neighbours are combined at merge points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Information flows forward, from entry to exit.
    ///
    /// At join points (nodes with multiple predecessors), the exit states of
    /// all predecessors are combined using the meet operation.
    ///
    /// Examples: reaching definitions, available expressions.
    Forward,

    /// Information flows backward, from exit to entry.
    ///
    /// At split points (nodes with multiple successors), the entry states of
    /// all successors are combined.
    ///
    /// Examples: live variables, very busy expressions.
    Backward,
}

/// A data flow analysis over a [`ControlFlowGraph`].
///
/// This trait defines the interface for a data flow analysis. Implementations
/// provide the transfer function and boundary conditions; the solver handles
/// iteration to a fixpoint.
///
/// # Transfer Functions
///
/// For forward analyses: `exit[n] = transfer(n, entry[n])`
/// For backward analyses: `entry[n] = transfer(n, exit[n])`
///
/// The transfer function must be monotone and the lattice must have finite
/// height, otherwise the solver may not terminate.
///
/// # Example
///
/// ```rust
/// use whileflow::{
///     analysis::{
///         dataflow::{DataFlowAnalysis, DataFlowSolver, Direction},
///         CfgBuilder, CfgNode, ControlFlowGraph,
///     },
///     syntax::{Expression, Statement},
///     utils::{graph::NodeId, BitSet},
/// };
///
/// /// Marks every node that can be reached after a `skip`.
/// struct AfterSkip;
///
/// impl DataFlowAnalysis for AfterSkip {
///     type Lattice = BitSet;
///     const DIRECTION: Direction = Direction::Forward;
///
///     fn boundary(&self, _cfg: &ControlFlowGraph) -> BitSet {
///         BitSet::new(1)
///     }
///
///     fn initial(&self, _cfg: &ControlFlowGraph) -> BitSet {
///         BitSet::new(1)
///     }
///
///     fn transfer(&self, _id: NodeId, node: &CfgNode, input: &BitSet, _cfg: &ControlFlowGraph) -> BitSet {
///         let mut out = input.clone();
///         if node.expression().is_none() {
///             out.insert(0);
///         }
///         out
///     }
/// }
///
/// let program = Statement::sequence(vec![
///     Statement::skip(),
///     Statement::assign("x", Expression::constant(1)),
/// ]);
/// let cfg = CfgBuilder::build(&program)?;
/// let results = DataFlowSolver::new(&AfterSkip, &cfg).solve();
///
/// assert!(results.in_state(cfg.exit()).is_some_and(|s| s.contains(0)));
/// # Ok::<(), whileflow::Error>(())
/// ```
pub trait DataFlowAnalysis {
    /// The lattice type for this analysis.
    ///
    /// This must implement `MeetSemiLattice` to support combining values
    /// at control flow merge points.
    type Lattice: MeetSemiLattice;

    /// The direction of this analysis.
    const DIRECTION: Direction;

    /// Returns the value at the boundary of the program.
    ///
    /// For forward analyses, this is the value flowing into the entry node.
    /// For backward analyses, this is the value flowing out of the exit node.
    /// A boundary node that also has incoming flow (a program starting with a
    /// loop test) meets the boundary with that flow.
    fn boundary(&self, cfg: &ControlFlowGraph) -> Self::Lattice;

    /// Returns the initial value for interior nodes.
    ///
    /// This must be the top element of the lattice, the identity of meet.
    fn initial(&self, cfg: &ControlFlowGraph) -> Self::Lattice;

    /// Computes the transfer function for a node.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier of the node being processed
    /// * `node` - The node itself
    /// * `input` - The state flowing into (forward) or out of (backward) the node
    /// * `cfg` - The complete graph for context
    fn transfer(
        &self,
        id: NodeId,
        node: &CfgNode,
        input: &Self::Lattice,
        cfg: &ControlFlowGraph,
    ) -> Self::Lattice;
}

/// Per-node gen and kill sets for bit-vector analyses.
///
/// Analyses whose transfer function has the classic form
/// `out = gen ∪ (in \ kill)` precompute both sets once per node and delegate
/// to [`GenKill::apply_gen_kill`]. Gen/kill sets live in the analysis, indexed
/// by [`NodeId`]; the graph itself never stores analysis facts.
pub trait GenKill {
    /// Returns the elements generated by `node`.
    fn gen_set(&self, node: NodeId) -> &BitSet;

    /// Returns the elements invalidated by `node`.
    fn kill_set(&self, node: NodeId) -> &BitSet;

    /// Computes `gen(node) ∪ (input \ kill(node))`.
    #[must_use]
    fn apply_gen_kill(&self, node: NodeId, input: &BitSet) -> BitSet {
        let mut result = input.clone();
        result.difference_with(self.kill_set(node));
        result.union_with(self.gen_set(node));
        result
    }
}

/// A condition noticed by the solver that does not prevent a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisWarning {
    /// The node takes no part in the propagation: it is not reachable from the
    /// entry (forward analyses) or cannot reach the exit (backward analyses).
    /// Its states are left at the initial value.
    UnreachableNode {
        /// The label of the skipped node
        label: Label,
    },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::UnreachableNode { label } => {
                write!(f, "node {label} is unreachable, its state was never updated")
            }
        }
    }
}

/// Results of a data flow analysis.
///
/// This provides access to the computed abstract values at node boundaries,
/// by [`NodeId`] or by [`Label`].
#[derive(Debug, Clone)]
pub struct AnalysisResults<L> {
    /// Input state for each node (before the node executes).
    pub in_states: Vec<L>,
    /// Output state for each node (after the node executes).
    pub out_states: Vec<L>,
    /// Label of each node, used for label lookups.
    labels: Vec<Label>,
    /// Number of full passes the solver ran, the last one being the pass
    /// that observed no change.
    passes: usize,
    /// Nodes the solver could not reach.
    warnings: Vec<AnalysisWarning>,
}

impl<L> AnalysisResults<L> {
    /// Creates new analysis results.
    pub(crate) fn new(
        in_states: Vec<L>,
        out_states: Vec<L>,
        labels: Vec<Label>,
        passes: usize,
        warnings: Vec<AnalysisWarning>,
    ) -> Self {
        Self {
            in_states,
            out_states,
            labels,
            passes,
            warnings,
        }
    }

    /// Returns the input state for a node, or `None` if the index is out of bounds.
    #[must_use]
    pub fn in_state(&self, node: NodeId) -> Option<&L> {
        self.in_states.get(node.index())
    }

    /// Returns the output state for a node, or `None` if the index is out of bounds.
    #[must_use]
    pub fn out_state(&self, node: NodeId) -> Option<&L> {
        self.out_states.get(node.index())
    }

    /// Returns the state before the node labelled `label` executes.
    #[must_use]
    pub fn entry_state(&self, label: Label) -> Option<&L> {
        self.position(label).and_then(|i| self.in_states.get(i))
    }

    /// Returns the state after the node labelled `label` executes.
    #[must_use]
    pub fn exit_state(&self, label: Label) -> Option<&L> {
        self.position(label).and_then(|i| self.out_states.get(i))
    }

    /// Returns the labels of all nodes, in node order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.in_states.len()
    }

    /// Returns the number of passes the solver ran.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Returns the warnings collected while solving.
    #[must_use]
    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.warnings
    }

    fn position(&self, label: Label) -> Option<usize> {
        // Statement labels are dense and 1-based for built graphs.
        if let Some(n) = label.number() {
            let guess = (n as usize).checked_sub(1)?;
            if self.labels.get(guess) == Some(&label) {
                return Some(guess);
            }
        }
        self.labels.iter().position(|&l| l == label)
    }
}
