//! Reaching definitions analysis.
//!
//! Reaching definitions computes, for each program point, which assignments
//! may reach that point without being overwritten by an intervening
//! assignment to the same variable.
//!
//! # Algorithm
//!
//! Every assignment node is one definition. For each node n:
//! - `GEN[n]` = `{n}` if n is an assignment
//! - `KILL[n]` = every other assignment to the same variable
//! - `IN[n]` = ∪{OUT[p] | p is a predecessor of n}
//! - `OUT[n]` = GEN[n] ∪ (IN[n] - KILL[n])
//!
//! No definition reaches the entry of the program.

use crate::{
    analysis::{
        cfg::{CfgNode, ControlFlowGraph, Label},
        dataflow::{
            framework::{DataFlowAnalysis, Direction, GenKill},
            lattice::{JoinSemiLattice, Lattice, MeetSemiLattice},
        },
    },
    syntax::Variable,
    utils::{graph::NodeId, BitSet},
};

/// One definition: an assignment node and the variable it writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Definition {
    label: Label,
    variable: Variable,
}

/// Reaching definitions analysis.
///
/// Computes which assignments may reach each node.
///
/// # Example
///
/// ```rust
/// use whileflow::{
///     analysis::{
///         dataflow::{DataFlowSolver, ReachingDefinitions},
///         CfgBuilder, Label,
///     },
///     syntax::{Expression, Statement},
/// };
///
/// let program = Statement::sequence(vec![
///     Statement::assign("x", Expression::constant(1)),
///     Statement::assign("x", Expression::constant(2)),
/// ]);
/// let cfg = CfgBuilder::build(&program)?;
///
/// let analysis = ReachingDefinitions::new(&cfg);
/// let results = DataFlowSolver::new(&analysis, &cfg).solve();
///
/// // The second assignment overwrites the first.
/// let at_end = results.entry_state(Label::Exit).map(|s| analysis.definitions(s));
/// assert_eq!(at_end.map(|d| d[0].0), Some(Label::Stmt(2)));
/// # Ok::<(), whileflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReachingDefinitions {
    /// Every definition, by bit index, in label order.
    definitions: Vec<Definition>,
    /// GEN sets for each node (the definition created by the node).
    gen_sets: Vec<BitSet>,
    /// KILL sets for each node (other definitions of the same variable).
    kill_sets: Vec<BitSet>,
}

impl ReachingDefinitions {
    /// Creates a new reaching definitions analysis for the given graph.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        let mut definitions = Vec::new();
        let mut def_of_node = Vec::with_capacity(cfg.node_count());
        for (_, node) in cfg.nodes() {
            def_of_node.push(node.assigned_variable().map(|variable| {
                definitions.push(Definition {
                    label: node.label(),
                    variable: variable.clone(),
                });
                definitions.len() - 1
            }));
        }

        let count = definitions.len();
        let mut gen_sets = Vec::with_capacity(def_of_node.len());
        let mut kill_sets = Vec::with_capacity(def_of_node.len());

        for def in def_of_node {
            let mut gen = BitSet::new(count);
            let mut kill = BitSet::new(count);
            if let Some(own) = def {
                gen.insert(own);
                let variable = &definitions[own].variable;
                for (other, candidate) in definitions.iter().enumerate() {
                    if other != own && &candidate.variable == variable {
                        kill.insert(other);
                    }
                }
            }
            gen_sets.push(gen);
            kill_sets.push(kill);
        }

        Self {
            definitions,
            gen_sets,
            kill_sets,
        }
    }

    /// Returns the number of definitions being tracked.
    #[must_use]
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Returns the bit index of the definition made by the node labelled `label`.
    #[must_use]
    pub fn definition_index(&self, label: Label) -> Option<usize> {
        self.definitions.iter().position(|def| def.label == label)
    }

    /// Returns the definitions in `state` as `(label, variable)` pairs, in
    /// label order.
    #[must_use]
    pub fn definitions<'s>(&'s self, state: &ReachingDefsResult) -> Vec<(Label, &'s Variable)> {
        state
            .defs
            .iter()
            .filter_map(|bit| self.definitions.get(bit))
            .map(|def| (def.label, &def.variable))
            .collect()
    }

    /// Returns `true` if the definition made at `label` is in `state`.
    #[must_use]
    pub fn reaches(&self, state: &ReachingDefsResult, label: Label) -> bool {
        self.definition_index(label)
            .is_some_and(|bit| state.defs.contains(bit))
    }
}

impl GenKill for ReachingDefinitions {
    fn gen_set(&self, node: NodeId) -> &BitSet {
        &self.gen_sets[node.index()]
    }

    fn kill_set(&self, node: NodeId) -> &BitSet {
        &self.kill_sets[node.index()]
    }
}

impl DataFlowAnalysis for ReachingDefinitions {
    type Lattice = ReachingDefsResult;
    const DIRECTION: Direction = Direction::Forward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        ReachingDefsResult::new(self.definitions.len())
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        // Initially, no definitions reach interior nodes
        ReachingDefsResult::new(self.definitions.len())
    }

    fn transfer(
        &self,
        id: NodeId,
        _node: &CfgNode,
        input: &Self::Lattice,
        _cfg: &ControlFlowGraph,
    ) -> Self::Lattice {
        ReachingDefsResult {
            defs: self.apply_gen_kill(id, &input.defs),
        }
    }
}

/// Result of reaching definitions analysis for a single program point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReachingDefsResult {
    /// Bit vector of reaching definitions (indexed by definition).
    defs: BitSet,
}

impl ReachingDefsResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new(num_defs: usize) -> Self {
        Self {
            defs: BitSet::new(num_defs),
        }
    }

    /// Returns the number of reaching definitions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.defs.count()
    }

    /// Returns `true` if no definitions reach this point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Returns the underlying bit set.
    #[must_use]
    pub const fn as_bitset(&self) -> &BitSet {
        &self.defs
    }
}

impl MeetSemiLattice for ReachingDefsResult {
    /// Meet is union (may analysis: a definition reaches if it reaches from ANY predecessor).
    fn meet(&self, other: &Self) -> Self {
        let mut result = self.defs.clone();
        result.union_with(&other.defs);
        Self { defs: result }
    }

    fn is_bottom(&self) -> bool {
        // Bottom is when all definitions reach (full set)
        self.defs.is_full()
    }
}

impl JoinSemiLattice for ReachingDefsResult {
    fn join(&self, other: &Self) -> Self {
        let mut result = self.defs.clone();
        result.intersect_with(&other.defs);
        Self { defs: result }
    }

    fn is_top(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Lattice for ReachingDefsResult {
    fn top_of(&self) -> Self {
        Self::new(self.defs.len())
    }

    fn bottom_of(&self) -> Self {
        Self {
            defs: BitSet::full(self.defs.len()),
        }
    }
}
