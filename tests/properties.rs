//! Property-based tests over randomly generated WHILE programs.
//!
//! Every generated program is well formed: blocks are never empty and
//! variable names come from a small fixed pool, so the same variables are
//! read and written in many places.

use proptest::prelude::*;
use strum::IntoEnumIterator;
use whileflow::{
    analysis::{
        dataflow::{
            AvailableExpressions, DataFlowAnalysis, DataFlowSolver, ExpressionScope,
            IterationStrategy, Lattice, LiveVariables, ReachingDefinitions,
        },
        CfgBuilder, CfgEdgeKind, ControlFlowGraph, Label,
    },
    syntax::{BinaryOperator, Expression, Statement},
};

fn variable() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["a", "b", "x", "y"])
}

fn expression() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        3 => variable().prop_map(Expression::var),
        1 => (0i64..10).prop_map(Expression::constant),
    ];
    leaf.prop_recursive(2, 8, 2, |inner| {
        (
            prop::sample::select(BinaryOperator::iter().collect::<Vec<_>>()),
            inner.clone(),
            inner,
        )
            .prop_map(|(op, left, right)| Expression::binary(op, left, right))
    })
}

fn statement() -> impl Strategy<Value = Statement> {
    let leaf = prop_oneof![
        1 => Just(Statement::skip()),
        4 => (variable(), expression()).prop_map(|(v, e)| Statement::assign(v, e)),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Statement::sequence),
            (expression(), inner.clone()).prop_map(|(c, body)| Statement::while_loop(c, body)),
            (expression(), inner.clone(), inner)
                .prop_map(|(c, t, f)| Statement::if_then_else(c, t, f)),
        ]
    })
}

/// Resuming from a converged result must not change anything.
fn assert_idempotent<A>(analysis: &A, cfg: &ControlFlowGraph) -> Result<(), TestCaseError>
where
    A: DataFlowAnalysis + Sync,
    A::Lattice: Send + Sync,
{
    let results = DataFlowSolver::new(analysis, cfg).solve();
    let mut solver = DataFlowSolver::resume(analysis, cfg, results);
    prop_assert!(!solver.pass());
    Ok(())
}

/// Every pass may only move states down the lattice.
fn assert_descending<A>(analysis: &A, cfg: &ControlFlowGraph) -> Result<(), TestCaseError>
where
    A: DataFlowAnalysis + Sync,
    A::Lattice: Lattice + Send + Sync,
{
    let mut solver = DataFlowSolver::new(analysis, cfg);
    loop {
        let before = solver.out_states().to_vec();
        let changed = solver.pass();
        for (new, old) in solver.out_states().iter().zip(&before) {
            prop_assert!(new.leq(old), "{new:?} is not below {old:?}");
        }
        if !changed {
            return Ok(());
        }
        prop_assert!(solver.passes() <= cfg.node_count() * 64 + 2);
    }
}

/// Both strategies must agree on every state.
fn assert_strategies_agree<A>(analysis: &A, cfg: &ControlFlowGraph) -> Result<(), TestCaseError>
where
    A: DataFlowAnalysis + Sync,
    A::Lattice: Send + Sync,
{
    let gauss = DataFlowSolver::new(analysis, cfg).solve();
    let jacobi = DataFlowSolver::new(analysis, cfg)
        .with_strategy(IterationStrategy::Jacobi)
        .solve();
    prop_assert_eq!(&gauss.in_states, &jacobi.in_states);
    prop_assert_eq!(&gauss.out_states, &jacobi.out_states);
    prop_assert!(gauss.passes() <= jacobi.passes());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: one node per elementary statement or test, plus the exit
    #[test]
    fn prop_node_per_label(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();
        prop_assert_eq!(cfg.node_count(), program.label_count() + 1);

        let mut labels: Vec<_> = cfg.nodes().map(|(_, node)| node.label()).collect();
        labels.sort();
        let expected: Vec<_> = (1..=program.label_count() as u32)
            .map(Label::Stmt)
            .chain([Label::Exit])
            .collect();
        prop_assert_eq!(labels, expected);
    }

    /// Property: only back edges lead to a smaller label
    #[test]
    fn prop_labels_increase_along_forward_edges(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();
        for (from, to, kind) in cfg.edges_with_kind() {
            if kind == CfgEdgeKind::BackEdge {
                prop_assert!(to < from, "back edge {from} -> {to}");
                prop_assert!(cfg.is_back_edge(from, to));
            } else {
                prop_assert!(from < to, "{kind} edge {from} -> {to}");
            }
        }
    }

    /// Property: a single entry and a single exit, with every node on some
    /// path between them
    #[test]
    fn prop_single_entry_and_exit(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();

        prop_assert_eq!(cfg.entry_label(), Label::Stmt(1));
        prop_assert!(cfg.reachable().into_iter().all(|r| r));
        prop_assert!(cfg.reaches_exit().into_iter().all(|r| r));

        let sinks: Vec<_> = cfg
            .node_ids()
            .filter(|&n| cfg.successors(n).next().is_none())
            .collect();
        prop_assert_eq!(sinks, vec![cfg.exit()]);

        // The entry may be a loop test with a back edge into it, so only
        // require that no other node lacks predecessors.
        for node in cfg.node_ids() {
            if cfg.predecessors(node).next().is_none() {
                prop_assert_eq!(node, cfg.entry());
            }
        }
    }

    /// Property: solving again from a fixpoint changes nothing
    #[test]
    fn prop_fixpoint_is_stable(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();
        assert_idempotent(&AvailableExpressions::new(&cfg), &cfg)?;
        assert_idempotent(&ReachingDefinitions::new(&cfg), &cfg)?;
        assert_idempotent(&LiveVariables::new(&cfg), &cfg)?;
    }

    /// Property: states descend monotonically from the initial value
    #[test]
    fn prop_states_descend(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();
        assert_descending(&AvailableExpressions::with_scope(&cfg, ExpressionScope::Nested), &cfg)?;
        assert_descending(&ReachingDefinitions::new(&cfg), &cfg)?;
        assert_descending(&LiveVariables::new(&cfg), &cfg)?;
    }

    /// Property: Jacobi and Gauss-Seidel iteration compute the same fixpoint
    #[test]
    fn prop_strategies_agree(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();
        assert_strategies_agree(&AvailableExpressions::new(&cfg), &cfg)?;
        assert_strategies_agree(&ReachingDefinitions::new(&cfg), &cfg)?;
        assert_strategies_agree(&LiveVariables::new(&cfg), &cfg)?;
    }

    /// Property: some definition of every assigned variable reaches the end
    #[test]
    fn prop_assigned_variables_reach_exit(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();
        let analysis = ReachingDefinitions::new(&cfg);
        let results = DataFlowSolver::new(&analysis, &cfg).solve();
        let at_exit = analysis.definitions(results.entry_state(Label::Exit).unwrap());

        for var in program.assigned_variables() {
            prop_assert!(at_exit.iter().any(|(_, v)| *v == var), "no definition of {var}");
        }
    }

    /// Property: nothing is live at the end, and nothing is available at the start
    #[test]
    fn prop_boundary_states(program in statement()) {
        let cfg = CfgBuilder::build(&program).unwrap();

        let live = LiveVariables::new(&cfg);
        let results = DataFlowSolver::new(&live, &cfg).solve();
        prop_assert!(results.exit_state(Label::Exit).unwrap().is_empty());

        let available = AvailableExpressions::new(&cfg);
        let results = DataFlowSolver::new(&available, &cfg).solve();
        prop_assert!(results.entry_state(Label::Stmt(1)).unwrap().is_empty());
    }
}
