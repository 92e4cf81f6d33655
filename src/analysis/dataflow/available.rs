//! Available expressions analysis.
//!
//! An expression is *available* at a program point if, on every path from the
//! entry to that point, it has been computed and none of its operands has been
//! reassigned since. Available expressions drive common subexpression
//! elimination: an available expression need not be computed again.
//!
//! # Algorithm
//!
//! This is a forward *must* analysis over the binary-operation expressions of
//! the program:
//!
//! - `GEN[n]` = for `v := e`, `{e}` if `e` is a binary operation not mentioning
//!   `v`; for a test `c`, `{c}` if `c` is a binary operation
//! - `KILL[n]` = for `v := e`, every tracked expression mentioning `v`
//! - `IN[n]` = ∩{OUT[p] | p is a predecessor of n}, and `IN[entry]` = ∅
//! - `OUT[n]` = GEN[n] ∪ (IN[n] - KILL[n])
//!
//! Interior nodes start with every expression available and lose them until
//! the fixpoint is reached.

use std::collections::HashMap;

use strum::{Display, EnumIter, EnumString};

use crate::{
    analysis::{
        cfg::{CfgNode, ControlFlowGraph, NodePayload},
        dataflow::{
            framework::{DataFlowAnalysis, Direction, GenKill},
            lattice::{JoinSemiLattice, Lattice, MeetSemiLattice},
        },
    },
    syntax::Expression,
    utils::{graph::NodeId, BitSet},
};

/// Which expressions are tracked by [`AvailableExpressions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ExpressionScope {
    /// Only whole right-hand sides and whole test conditions.
    #[default]
    TopLevel,
    /// Every binary sub-expression of right-hand sides and tests.
    Nested,
}

impl ExpressionScope {
    /// Returns the expressions of `expr` tracked under this scope.
    fn candidates(self, expr: &Expression) -> Vec<&Expression> {
        match self {
            ExpressionScope::TopLevel if expr.is_binary() => vec![expr],
            ExpressionScope::TopLevel => Vec::new(),
            ExpressionScope::Nested => expr.binary_subexpressions(),
        }
    }
}

/// Available expressions analysis.
///
/// The universe of tracked expressions is collected from the graph when the
/// analysis is created, numbered in label order of first occurrence.
///
/// # Example
///
/// ```rust
/// use whileflow::{
///     analysis::{
///         dataflow::{AvailableExpressions, DataFlowSolver},
///         CfgBuilder, Label,
///     },
///     syntax::{BinaryOperator, Expression, Statement},
/// };
///
/// let a_plus_b = Expression::binary(BinaryOperator::Add, Expression::var("a"), Expression::var("b"));
/// let program = Statement::sequence(vec![
///     Statement::assign("x", a_plus_b.clone()),
///     Statement::assign("a", Expression::constant(1)),
/// ]);
/// let cfg = CfgBuilder::build(&program)?;
///
/// let analysis = AvailableExpressions::new(&cfg);
/// let results = DataFlowSolver::new(&analysis, &cfg).solve();
///
/// let after_first = results.exit_state(Label::Stmt(1)).map(|s| analysis.is_available(s, &a_plus_b));
/// let after_second = results.exit_state(Label::Stmt(2)).map(|s| analysis.is_available(s, &a_plus_b));
/// assert_eq!(after_first, Some(true));
/// assert_eq!(after_second, Some(false));
/// # Ok::<(), whileflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AvailableExpressions {
    /// Which sub-expressions are tracked.
    scope: ExpressionScope,
    /// Tracked expressions, by bit index.
    universe: Vec<Expression>,
    /// Bit index of each tracked expression.
    index: HashMap<Expression, usize>,
    /// GEN sets for each node.
    gen_sets: Vec<BitSet>,
    /// KILL sets for each node.
    kill_sets: Vec<BitSet>,
}

impl AvailableExpressions {
    /// Creates the analysis for `cfg`, tracking top-level expressions.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        Self::with_scope(cfg, ExpressionScope::default())
    }

    /// Creates the analysis for `cfg` with the given expression scope.
    #[must_use]
    pub fn with_scope(cfg: &ControlFlowGraph, scope: ExpressionScope) -> Self {
        let mut universe = Vec::new();
        let mut index = HashMap::new();
        for expr in cfg
            .nodes()
            .filter_map(|(_, node)| node.expression())
            .flat_map(|expr| scope.candidates(expr))
        {
            if !index.contains_key(expr) {
                index.insert(expr.clone(), universe.len());
                universe.push(expr.clone());
            }
        }

        let size = universe.len();
        let mut gen_sets = Vec::with_capacity(cfg.node_count());
        let mut kill_sets = Vec::with_capacity(cfg.node_count());

        for (_, node) in cfg.nodes() {
            let mut gen = BitSet::new(size);
            let mut kill = BitSet::new(size);

            match node.payload() {
                NodePayload::Assignment {
                    variable,
                    expression,
                } => {
                    // Expressions reading the assigned variable are stale right after the
                    // assignment, including the right-hand side itself.
                    for expr in scope.candidates(expression) {
                        if !expr.mentions(variable) {
                            if let Some(&bit) = index.get(expr) {
                                gen.insert(bit);
                            }
                        }
                    }
                    for (bit, expr) in universe.iter().enumerate() {
                        if expr.mentions(variable) {
                            kill.insert(bit);
                        }
                    }
                }
                NodePayload::Condition(condition) => {
                    for expr in scope.candidates(condition) {
                        if let Some(&bit) = index.get(expr) {
                            gen.insert(bit);
                        }
                    }
                }
                NodePayload::Skip | NodePayload::Exit => {}
            }

            gen_sets.push(gen);
            kill_sets.push(kill);
        }

        Self {
            scope,
            universe,
            index,
            gen_sets,
            kill_sets,
        }
    }

    /// Returns the expression scope.
    #[must_use]
    pub const fn scope(&self) -> ExpressionScope {
        self.scope
    }

    /// Returns the tracked expressions, in bit order.
    #[must_use]
    pub fn universe(&self) -> &[Expression] {
        &self.universe
    }

    /// Returns the bit index of a tracked expression.
    #[must_use]
    pub fn expression_index(&self, expr: &Expression) -> Option<usize> {
        self.index.get(expr).copied()
    }

    /// Returns `true` if `expr` is available in `state`.
    #[must_use]
    pub fn is_available(&self, state: &AvailableExprsResult, expr: &Expression) -> bool {
        self.expression_index(expr)
            .is_some_and(|bit| state.exprs.contains(bit))
    }

    /// Returns the expressions available in `state`, in bit order.
    #[must_use]
    pub fn expressions<'s>(&'s self, state: &AvailableExprsResult) -> Vec<&'s Expression> {
        state
            .exprs
            .iter()
            .filter_map(|bit| self.universe.get(bit))
            .collect()
    }
}

impl GenKill for AvailableExpressions {
    fn gen_set(&self, node: NodeId) -> &BitSet {
        &self.gen_sets[node.index()]
    }

    fn kill_set(&self, node: NodeId) -> &BitSet {
        &self.kill_sets[node.index()]
    }
}

impl DataFlowAnalysis for AvailableExpressions {
    type Lattice = AvailableExprsResult;
    const DIRECTION: Direction = Direction::Forward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        // Nothing has been computed before the program starts.
        AvailableExprsResult::none(self.universe.len())
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        AvailableExprsResult::all(self.universe.len())
    }

    fn transfer(
        &self,
        id: NodeId,
        _node: &CfgNode,
        input: &Self::Lattice,
        _cfg: &ControlFlowGraph,
    ) -> Self::Lattice {
        AvailableExprsResult {
            exprs: self.apply_gen_kill(id, &input.exprs),
        }
    }
}

/// Result of available expressions analysis for a single program point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvailableExprsResult {
    /// Bit vector of available expressions (indexed like the analysis universe).
    exprs: BitSet,
}

impl AvailableExprsResult {
    /// Creates a result with no expression available.
    #[must_use]
    pub fn none(universe: usize) -> Self {
        Self {
            exprs: BitSet::new(universe),
        }
    }

    /// Creates a result with every expression available.
    #[must_use]
    pub fn all(universe: usize) -> Self {
        Self {
            exprs: BitSet::full(universe),
        }
    }

    /// Returns `true` if the expression with the given bit index is available.
    #[must_use]
    pub fn contains(&self, bit: usize) -> bool {
        self.exprs.contains(bit)
    }

    /// Returns the number of available expressions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.exprs.count()
    }

    /// Returns `true` if no expression is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Returns `true` if every expression of `self` is also available in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.exprs.is_subset(&other.exprs)
    }

    /// Returns the underlying bit set.
    #[must_use]
    pub const fn as_bitset(&self) -> &BitSet {
        &self.exprs
    }
}

impl MeetSemiLattice for AvailableExprsResult {
    /// Meet is intersection (must analysis: available only if available on ALL paths).
    fn meet(&self, other: &Self) -> Self {
        let mut exprs = self.exprs.clone();
        exprs.intersect_with(&other.exprs);
        Self { exprs }
    }

    fn is_bottom(&self) -> bool {
        self.exprs.is_empty()
    }
}

impl JoinSemiLattice for AvailableExprsResult {
    fn join(&self, other: &Self) -> Self {
        let mut exprs = self.exprs.clone();
        exprs.union_with(&other.exprs);
        Self { exprs }
    }

    fn is_top(&self) -> bool {
        self.exprs.is_full()
    }
}

impl Lattice for AvailableExprsResult {
    fn top_of(&self) -> Self {
        Self::all(self.exprs.len())
    }

    fn bottom_of(&self) -> Self {
        Self::none(self.exprs.len())
    }
}
