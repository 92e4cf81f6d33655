//! Live variable analysis.
//!
//! A variable is *live* at a program point if there exists a path from that
//! point to a use of the variable that doesn't pass through an assignment to
//! the variable.
//!
//! # Uses
//!
//! Live variable analysis is essential for:
//! - **Dead code elimination**: If an assigned value is never live, the assignment is dead
//! - **Register allocation**: Variables live at the same time need different registers
//!
//! # Algorithm
//!
//! This is a backward data flow analysis:
//!
//! - `USE[n]` = variables read by the right-hand side or test of n
//! - `DEF[n]` = the variable assigned by n
//! - `OUT[n]` = ∪{IN[s] | s is a successor of n}, and `OUT[exit]` = ∅
//! - `IN[n]` = USE[n] ∪ (OUT[n] - DEF[n])
//!
//! A node reads its operands before writing its target, so `x := x + 1`
//! keeps `x` live on entry.

use std::collections::BTreeSet;

use crate::{
    analysis::{
        cfg::{CfgNode, ControlFlowGraph},
        dataflow::{
            framework::{DataFlowAnalysis, Direction, GenKill},
            lattice::{JoinSemiLattice, Lattice, MeetSemiLattice},
        },
    },
    syntax::Variable,
    utils::{graph::NodeId, BitSet},
};

/// Live variable analysis.
///
/// Computes which variables are live at each program point.
/// A variable is live if its value may be used on some path from
/// that point forward.
///
/// # Example
///
/// ```rust
/// use whileflow::{
///     analysis::{
///         dataflow::{DataFlowSolver, LiveVariables},
///         CfgBuilder, Label,
///     },
///     syntax::{BinaryOperator, Expression, Statement, Variable},
/// };
///
/// // x := 1; y := x + 2
/// let program = Statement::sequence(vec![
///     Statement::assign("x", Expression::constant(1)),
///     Statement::assign(
///         "y",
///         Expression::binary(BinaryOperator::Add, Expression::var("x"), Expression::constant(2)),
///     ),
/// ]);
/// let cfg = CfgBuilder::build(&program)?;
///
/// let analysis = LiveVariables::new(&cfg);
/// let results = DataFlowSolver::new(&analysis, &cfg).solve();
///
/// let live = results.exit_state(Label::Stmt(1)).map(|s| analysis.is_live(s, &Variable::new("x")));
/// assert_eq!(live, Some(true));
/// # Ok::<(), whileflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LiveVariables {
    /// Every variable of the program, by bit index, in name order.
    variables: Vec<Variable>,
    /// USE sets for each node (variables read).
    use_sets: Vec<BitSet>,
    /// DEF sets for each node (variable assigned).
    def_sets: Vec<BitSet>,
}

impl LiveVariables {
    /// Creates a new live variables analysis for the given graph.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        let mut names = BTreeSet::new();
        for (_, node) in cfg.nodes() {
            names.extend(node.assigned_variable());
            if let Some(expr) = node.expression() {
                names.extend(expr.variables());
            }
        }
        let variables: Vec<Variable> = names.into_iter().cloned().collect();
        let num_vars = variables.len();
        let bit_of = |var: &Variable| variables.binary_search(var).ok();

        let mut use_sets = Vec::with_capacity(cfg.node_count());
        let mut def_sets = Vec::with_capacity(cfg.node_count());

        for (_, node) in cfg.nodes() {
            let mut uses = BitSet::new(num_vars);
            let mut defs = BitSet::new(num_vars);

            if let Some(expr) = node.expression() {
                for bit in expr.variables().into_iter().filter_map(bit_of) {
                    uses.insert(bit);
                }
            }
            if let Some(bit) = node.assigned_variable().and_then(bit_of) {
                defs.insert(bit);
            }

            use_sets.push(uses);
            def_sets.push(defs);
        }

        Self {
            variables,
            use_sets,
            def_sets,
        }
    }

    /// Returns the number of variables being tracked.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Returns the bit index of a variable.
    #[must_use]
    pub fn variable_index(&self, var: &Variable) -> Option<usize> {
        self.variables.binary_search(var).ok()
    }

    /// Returns `true` if `var` is live in `state`.
    #[must_use]
    pub fn is_live(&self, state: &LivenessResult, var: &Variable) -> bool {
        self.variable_index(var)
            .is_some_and(|bit| state.live.contains(bit))
    }

    /// Returns the variables live in `state`, in name order.
    #[must_use]
    pub fn variables<'s>(&'s self, state: &LivenessResult) -> Vec<&'s Variable> {
        state
            .live
            .iter()
            .filter_map(|bit| self.variables.get(bit))
            .collect()
    }
}

impl GenKill for LiveVariables {
    fn gen_set(&self, node: NodeId) -> &BitSet {
        &self.use_sets[node.index()]
    }

    fn kill_set(&self, node: NodeId) -> &BitSet {
        &self.def_sets[node.index()]
    }
}

impl DataFlowAnalysis for LiveVariables {
    type Lattice = LivenessResult;
    const DIRECTION: Direction = Direction::Backward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        // At program exit, no variables are live
        LivenessResult::new(self.variables.len())
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        LivenessResult::new(self.variables.len())
    }

    fn transfer(
        &self,
        id: NodeId,
        _node: &CfgNode,
        output: &Self::Lattice,
        _cfg: &ControlFlowGraph,
    ) -> Self::Lattice {
        // For backward analysis: IN = USE ∪ (OUT - DEF)
        LivenessResult {
            live: self.apply_gen_kill(id, &output.live),
        }
    }
}

/// Result of live variable analysis for a single program point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LivenessResult {
    /// Bit vector of live variables (indexed by variable).
    live: BitSet,
}

impl LivenessResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            live: BitSet::new(num_vars),
        }
    }

    /// Returns the number of live variables.
    #[must_use]
    pub fn count(&self) -> usize {
        self.live.count()
    }

    /// Returns `true` if no variables are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Returns the underlying bit set.
    #[must_use]
    pub const fn as_bitset(&self) -> &BitSet {
        &self.live
    }
}

impl MeetSemiLattice for LivenessResult {
    /// Meet is union (a variable is live if it's live on ANY successor path).
    fn meet(&self, other: &Self) -> Self {
        let mut result = self.live.clone();
        result.union_with(&other.live);
        Self { live: result }
    }

    fn is_bottom(&self) -> bool {
        // Bottom is when all variables are live (full set)
        self.live.is_full()
    }
}

impl JoinSemiLattice for LivenessResult {
    fn join(&self, other: &Self) -> Self {
        let mut result = self.live.clone();
        result.intersect_with(&other.live);
        Self { live: result }
    }

    fn is_top(&self) -> bool {
        self.live.is_empty()
    }
}

impl Lattice for LivenessResult {
    fn top_of(&self) -> Self {
        Self::new(self.live.len())
    }

    fn bottom_of(&self) -> Self {
        Self {
            live: BitSet::full(self.live.len()),
        }
    }
}
