//! Chaotic-iteration data flow solver.
//!
//! This module provides the iterative solver that computes fixpoints for
//! data flow analyses. It recomputes every node in full passes over a fixed
//! visitation order until one pass changes nothing.
//!
//! # Algorithm
//!
//! 1. Initialize every node's states with the analysis' initial value (⊤)
//! 2. Fix the visitation order: reverse postorder for forward analyses,
//!    postorder for backward ones, so a node tends to be visited after the
//!    nodes feeding it
//! 3. Repeat full passes. For each node in order:
//!    a. Meet the states flowing in from predecessors (forward) or
//!       successors (backward), plus the boundary value at the entry (forward)
//!       or exit (backward) node
//!    b. Apply the transfer function
//!    c. Record whether either state of the node changed
//! 4. Stop after the first pass without changes
//!
//! # Iteration Strategies
//!
//! [`IterationStrategy::GaussSeidel`] updates states in place, so later nodes
//! of a pass already see values computed earlier in the same pass.
//! [`IterationStrategy::Jacobi`] computes a whole pass from the states left by
//! the previous pass; node updates of a pass are independent and are evaluated
//! in parallel. Both reach the same fixpoint; Gauss-Seidel never needs more
//! passes.
//!
//! # Complexity
//!
//! States only descend in the lattice, so each node changes at most `h` times
//! where `h` is the lattice height (the universe size for set domains). For
//! structured programs the number of passes is bounded by the loop nesting
//! depth plus a small constant.

use rayon::prelude::*;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, trace, warn};

use crate::{
    analysis::{
        cfg::{CfgNode, ControlFlowGraph},
        dataflow::{
            framework::{AnalysisResults, AnalysisWarning, DataFlowAnalysis, Direction},
            lattice::MeetSemiLattice,
        },
    },
    utils::graph::NodeId,
};

/// How states computed during a pass become visible to the rest of the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum IterationStrategy {
    /// In-place updates, in visitation order.
    #[default]
    GaussSeidel,
    /// Each pass reads only the previous pass' states; nodes are updated in parallel.
    Jacobi,
}

/// Chaotic-iteration data flow solver.
///
/// The solver borrows the analysis and the graph; it owns the per-node states
/// until [`DataFlowSolver::solve`] hands them over as [`AnalysisResults`].
///
/// # Usage
///
/// ```rust
/// use whileflow::{
///     analysis::{
///         dataflow::{DataFlowSolver, IterationStrategy, ReachingDefinitions},
///         CfgBuilder, Label,
///     },
///     syntax::{BinaryOperator, Expression, Statement},
/// };
///
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
/// let cfg = CfgBuilder::build(&program)?;
///
/// let analysis = ReachingDefinitions::new(&cfg);
/// let results = DataFlowSolver::new(&analysis, &cfg)
///     .with_strategy(IterationStrategy::Jacobi)
///     .solve();
///
/// let reaching_test = results.entry_state(Label::Stmt(2)).map(|s| analysis.definitions(s));
/// assert_eq!(reaching_test.map(|d| d.len()), Some(2));
/// # Ok::<(), whileflow::Error>(())
/// ```
pub struct DataFlowSolver<'a, A: DataFlowAnalysis> {
    /// The analysis being solved.
    analysis: &'a A,
    /// The graph being analysed.
    cfg: &'a ControlFlowGraph,
    /// Visibility of updates within a pass.
    strategy: IterationStrategy,
    /// Participating nodes in visitation order.
    order: Vec<(NodeId, &'a CfgNode)>,
    /// Nodes whose states flow into each node: predecessors (forward) or
    /// successors (backward).
    sources: Vec<Vec<NodeId>>,
    /// The entry (forward) or exit (backward) node.
    boundary_node: NodeId,
    /// The analysis' boundary value.
    boundary: A::Lattice,
    /// State fed to the transfer function: entry (forward) or exit (backward).
    before: Vec<A::Lattice>,
    /// State produced by the transfer function.
    after: Vec<A::Lattice>,
    /// Number of passes performed.
    passes: usize,
    /// Nodes left out of the propagation.
    warnings: Vec<AnalysisWarning>,
}

impl<'a, A> DataFlowSolver<'a, A>
where
    A: DataFlowAnalysis + Sync,
    A::Lattice: Send + Sync,
{
    /// Creates a new solver with every node at the initial value.
    ///
    /// Nodes that cannot take part in the propagation are reported as
    /// [`AnalysisWarning::UnreachableNode`] and never visited.
    #[must_use]
    pub fn new(analysis: &'a A, cfg: &'a ControlFlowGraph) -> Self {
        let count = cfg.node_count();
        let initial = analysis.initial(cfg);
        let boundary = analysis.boundary(cfg);

        let (participates, walk, boundary_node) = match A::DIRECTION {
            Direction::Forward => (cfg.reachable(), cfg.reverse_postorder(), cfg.entry()),
            Direction::Backward => (cfg.reaches_exit(), cfg.postorder(), cfg.exit()),
        };

        // The walk starts at the entry, so a backward analysis may still have
        // participating nodes it missed; they go last, in label order.
        let mut listed = vec![false; count];
        let mut order = Vec::with_capacity(count);
        let every_node: Vec<NodeId> = cfg.node_ids().collect();
        for node in walk.into_iter().chain(every_node) {
            let index = node.index();
            if participates[index] && !listed[index] {
                listed[index] = true;
                if let Some(data) = cfg.node(node) {
                    order.push((node, data));
                }
            }
        }

        let mut warnings = Vec::new();
        for (node, data) in cfg.nodes() {
            if !participates[node.index()] {
                warn!(label = %data.label(), "node is unreachable, keeping its initial state");
                warnings.push(AnalysisWarning::UnreachableNode {
                    label: data.label(),
                });
            }
        }

        let sources = cfg
            .node_ids()
            .map(|node| match A::DIRECTION {
                Direction::Forward => cfg.predecessors(node).collect(),
                Direction::Backward => cfg.successors(node).collect(),
            })
            .collect();

        let mut before = vec![initial.clone(); count];
        let after = vec![initial; count];
        if let Some(state) = before.get_mut(boundary_node.index()) {
            *state = boundary.clone();
        }

        Self {
            analysis,
            cfg,
            strategy: IterationStrategy::default(),
            order,
            sources,
            boundary_node,
            boundary,
            before,
            after,
            passes: 0,
            warnings,
        }
    }

    /// Creates a solver seeded with the states of a previous run.
    ///
    /// Resuming from a converged result makes the next pass report no
    /// change. Results computed for a graph of a different size are ignored
    /// and the solver starts from the initial values.
    #[must_use]
    pub fn resume(
        analysis: &'a A,
        cfg: &'a ControlFlowGraph,
        results: AnalysisResults<A::Lattice>,
    ) -> Self {
        let mut solver = Self::new(analysis, cfg);
        if results.node_count() == cfg.node_count() {
            let AnalysisResults {
                in_states,
                out_states,
                ..
            } = results;
            (solver.before, solver.after) = match A::DIRECTION {
                Direction::Forward => (in_states, out_states),
                Direction::Backward => (out_states, in_states),
            };
        }
        solver
    }

    /// Sets the iteration strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: IterationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the iteration strategy.
    #[must_use]
    pub const fn strategy(&self) -> IterationStrategy {
        self.strategy
    }

    /// Returns the number of passes performed so far.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Returns the current entry state of every node.
    #[must_use]
    pub fn in_states(&self) -> &[A::Lattice] {
        match A::DIRECTION {
            Direction::Forward => &self.before,
            Direction::Backward => &self.after,
        }
    }

    /// Returns the current exit state of every node.
    #[must_use]
    pub fn out_states(&self) -> &[A::Lattice] {
        match A::DIRECTION {
            Direction::Forward => &self.after,
            Direction::Backward => &self.before,
        }
    }

    /// Returns the nodes left out of the propagation.
    #[must_use]
    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.warnings
    }

    /// Runs one full pass over all participating nodes.
    ///
    /// Returns `true` if any state changed.
    pub fn pass(&mut self) -> bool {
        let changed = match self.strategy {
            IterationStrategy::GaussSeidel => self.gauss_seidel_pass(),
            IterationStrategy::Jacobi => self.jacobi_pass(),
        };
        self.passes += 1;
        trace!(pass = self.passes, changed, "data flow pass");
        changed
    }

    /// Solves the data flow analysis to a fixpoint.
    ///
    /// Returns the analysis results containing input and output states
    /// for each node.
    #[must_use]
    pub fn solve(mut self) -> AnalysisResults<A::Lattice> {
        while self.pass() {}
        debug!(
            direction = ?A::DIRECTION,
            strategy = %self.strategy,
            passes = self.passes,
            "data flow analysis converged"
        );
        self.into_results()
    }

    fn into_results(self) -> AnalysisResults<A::Lattice> {
        let labels = self
            .cfg
            .nodes()
            .map(|(_, node)| node.label())
            .collect();
        let (in_states, out_states) = match A::DIRECTION {
            Direction::Forward => (self.before, self.after),
            Direction::Backward => (self.after, self.before),
        };
        AnalysisResults::new(in_states, out_states, labels, self.passes, self.warnings)
    }

    fn gauss_seidel_pass(&mut self) -> bool {
        let mut changed = false;
        for i in 0..self.order.len() {
            let (id, node) = self.order[i];
            let (input, output) = self.evaluate(id, node);
            changed |= self.store(id, input, output);
        }
        changed
    }

    fn jacobi_pass(&mut self) -> bool {
        let updates: Vec<(NodeId, A::Lattice, A::Lattice)> = self
            .order
            .par_iter()
            .map(|&(id, node)| {
                let (input, output) = self.evaluate(id, node);
                (id, input, output)
            })
            .collect();

        let mut changed = false;
        for (id, input, output) in updates {
            changed |= self.store(id, input, output);
        }
        changed
    }

    /// Computes the combined input and the transferred output of a node from
    /// the current states.
    fn evaluate(&self, id: NodeId, node: &CfgNode) -> (A::Lattice, A::Lattice) {
        // The boundary is met with back-edge flow into the boundary node rather
        // than replacing it, so a loop test at the entry still sees its body.
        let mut input = (id == self.boundary_node).then(|| self.boundary.clone());
        for source in &self.sources[id.index()] {
            let state = &self.after[source.index()];
            input = Some(match input {
                None => state.clone(),
                Some(acc) => acc.meet(state),
            });
        }
        let input = input.unwrap_or_else(|| self.before[id.index()].clone());
        let output = self.analysis.transfer(id, node, &input, self.cfg);
        (input, output)
    }

    fn store(&mut self, id: NodeId, input: A::Lattice, output: A::Lattice) -> bool {
        let index = id.index();
        let changed = self.before[index] != input || self.after[index] != output;
        self.before[index] = input;
        self.after[index] = output;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::cfg::{CfgBuilder, CfgEdgeKind, Label, NodePayload},
        syntax::{Expression, Statement},
        test::factories::{bin, book_example, nested_loops, num, var},
        utils::{graph::DirectedGraph, BitSet},
    };

    /// Collects the nodes lying on some path to (forward) or from (backward)
    /// each node, the node itself included in its output.
    struct Visited<const BACKWARD: bool>;

    impl<const BACKWARD: bool> DataFlowAnalysis for Visited<BACKWARD> {
        type Lattice = BitSet;
        const DIRECTION: Direction = if BACKWARD {
            Direction::Backward
        } else {
            Direction::Forward
        };

        fn boundary(&self, cfg: &ControlFlowGraph) -> BitSet {
            BitSet::new(cfg.node_count())
        }

        fn initial(&self, cfg: &ControlFlowGraph) -> BitSet {
            BitSet::new(cfg.node_count())
        }

        fn transfer(&self, id: NodeId, _node: &CfgNode, input: &BitSet, _cfg: &ControlFlowGraph) -> BitSet {
            let mut out = input.clone();
            out.insert(id.index());
            out
        }
    }

    /// A constant lattice, checking the solver with a non-set domain.
    #[derive(Debug, Clone, PartialEq)]
    enum Constant {
        Top,
        Value(i64),
        Bottom,
    }

    impl MeetSemiLattice for Constant {
        fn meet(&self, other: &Self) -> Self {
            match (self, other) {
                (Self::Top, x) | (x, Self::Top) => x.clone(),
                (Self::Value(a), Self::Value(b)) if a == b => Self::Value(*a),
                _ => Self::Bottom,
            }
        }

        fn is_bottom(&self) -> bool {
            matches!(self, Self::Bottom)
        }
    }

    /// Tracks the constant value of `x`.
    struct ConstantX;

    impl DataFlowAnalysis for ConstantX {
        type Lattice = Constant;
        const DIRECTION: Direction = Direction::Forward;

        fn boundary(&self, _cfg: &ControlFlowGraph) -> Constant {
            Constant::Top
        }

        fn initial(&self, _cfg: &ControlFlowGraph) -> Constant {
            Constant::Top
        }

        fn transfer(&self, _id: NodeId, node: &CfgNode, input: &Constant, _cfg: &ControlFlowGraph) -> Constant {
            match node.payload() {
                NodePayload::Assignment {
                    variable,
                    expression,
                } if variable.name() == "x" => match expression {
                    Expression::Constant(c) => Constant::Value(*c),
                    _ => Constant::Bottom,
                },
                _ => input.clone(),
            }
        }
    }

    fn indices(set: &BitSet) -> Vec<usize> {
        set.iter().collect()
    }

    #[test]
    fn test_forward_fixpoint_on_loop() {
        let cfg = CfgBuilder::build(&book_example()).unwrap();
        let results = DataFlowSolver::new(&Visited::<false>, &cfg).solve();

        // The loop test sees its own body through the back edge.
        let test = cfg.node_id(Label::Stmt(3)).unwrap();
        assert_eq!(indices(results.in_state(test).unwrap()), vec![0, 1, 2, 3, 4]);
        assert_eq!(indices(results.in_state(cfg.entry()).unwrap()), Vec::<usize>::new());
        assert_eq!(results.passes(), 3);
        assert!(results.warnings().is_empty());
    }

    #[test]
    fn test_backward_fixpoint_on_loop() {
        let cfg = CfgBuilder::build(&book_example()).unwrap();
        let results = DataFlowSolver::new(&Visited::<true>, &cfg).solve();

        // Everything after the entry lies on some path from it.
        assert_eq!(
            indices(results.out_state(cfg.entry()).unwrap()),
            vec![1, 2, 3, 4, 5]
        );
        assert!(results.out_state(cfg.exit()).unwrap().is_empty());
    }

    #[test]
    fn test_strategies_agree() {
        let cfg = CfgBuilder::build(&nested_loops()).unwrap();
        let gauss = DataFlowSolver::new(&Visited::<false>, &cfg).solve();
        let jacobi = DataFlowSolver::new(&Visited::<false>, &cfg)
            .with_strategy(IterationStrategy::Jacobi)
            .solve();

        assert_eq!(gauss.in_states, jacobi.in_states);
        assert_eq!(gauss.out_states, jacobi.out_states);
        assert!(jacobi.passes() >= gauss.passes());
    }

    #[test]
    fn test_resume_from_fixpoint_changes_nothing() {
        let cfg = CfgBuilder::build(&nested_loops()).unwrap();
        let analysis = Visited::<false>;
        let results = DataFlowSolver::new(&analysis, &cfg).solve();
        let expected = results.out_states.clone();

        let mut solver = DataFlowSolver::resume(&analysis, &cfg, results);
        assert!(!solver.pass());
        assert_eq!(solver.out_states(), expected.as_slice());
        assert_eq!(solver.passes(), 1);
    }

    #[test]
    fn test_boundary_meets_back_edge_at_loop_entry() {
        let program = Statement::while_loop(
            bin("<", var("x"), num(3)),
            Statement::assign("x", bin("+", var("x"), num(1))),
        );
        let cfg = CfgBuilder::build(&program).unwrap();
        let results = DataFlowSolver::new(&Visited::<false>, &cfg).solve();

        assert_eq!(indices(results.in_state(cfg.entry()).unwrap()), vec![0, 1]);
    }

    #[test]
    fn test_constant_lattice_merges_branches() {
        let program = Statement::sequence(vec![Statement::if_then_else(
            var("c"),
            Statement::assign("x", num(1)),
            Statement::assign("x", num(2)),
        )]);
        let cfg = CfgBuilder::build(&program).unwrap();
        let results = DataFlowSolver::new(&ConstantX, &cfg).solve();

        assert_eq!(results.exit_state(Label::Stmt(2)), Some(&Constant::Value(1)));
        assert_eq!(results.entry_state(Label::Exit), Some(&Constant::Bottom));
    }

    /// 1: skip -> exit, 1 -> 2, and an orphan 3 -> exit
    fn graph_with_dead_nodes() -> ControlFlowGraph {
        let mut graph = DirectedGraph::new();
        let first = graph.add_node(CfgNode::new(Label::Stmt(1), NodePayload::Skip));
        let stuck = graph.add_node(CfgNode::new(Label::Stmt(2), NodePayload::Skip));
        let orphan = graph.add_node(CfgNode::new(Label::Stmt(3), NodePayload::Skip));
        let exit = graph.add_node(CfgNode::new(Label::Exit, NodePayload::Exit));
        graph.add_edge(first, exit, CfgEdgeKind::Sequential).unwrap();
        graph.add_edge(first, stuck, CfgEdgeKind::ConditionalTrue).unwrap();
        graph.add_edge(orphan, exit, CfgEdgeKind::Sequential).unwrap();
        ControlFlowGraph::new(graph, first, exit)
    }

    #[test]
    fn test_unreachable_nodes_are_reported_and_skipped() {
        let cfg = graph_with_dead_nodes();

        let forward = DataFlowSolver::new(&Visited::<false>, &cfg).solve();
        assert_eq!(
            forward.warnings(),
            &[AnalysisWarning::UnreachableNode {
                label: Label::Stmt(3)
            }]
        );
        let orphan = cfg.node_id(Label::Stmt(3)).unwrap();
        assert!(forward.in_state(orphan).unwrap().is_empty());
        assert!(forward.out_state(orphan).unwrap().is_empty());
        // The orphan's initial state is the meet identity, so it does not
        // disturb the exit.
        assert_eq!(indices(forward.in_state(cfg.exit()).unwrap()), vec![0]);

        let backward = DataFlowSolver::new(&Visited::<true>, &cfg).solve();
        assert_eq!(
            backward.warnings(),
            &[AnalysisWarning::UnreachableNode {
                label: Label::Stmt(2)
            }]
        );
        // Not reachable from the entry, but still reaches the exit.
        assert_eq!(indices(backward.in_state(orphan).unwrap()), vec![2, 3]);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(IterationStrategy::default(), IterationStrategy::GaussSeidel);
        assert_eq!(IterationStrategy::Jacobi.to_string(), "jacobi");
        assert_eq!(
            "gauss-seidel".parse::<IterationStrategy>().unwrap(),
            IterationStrategy::GaussSeidel
        );
    }
}
