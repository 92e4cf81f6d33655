//! Data flow integration tests.
//!
//! These tests drive the public API end to end:
//! 1. Build a WHILE program tree
//! 2. Build its control flow graph
//! 3. Run an analysis, either through the solver or through `analyze`
//! 4. Check the facts at individual labels

use whileflow::{
    analysis::{
        analyze, analyze_graph,
        dataflow::{
            AvailableExpressions, DataFlowSolver, IterationStrategy, LiveVariables,
            ReachingDefinitions,
        },
        AnalysisConfig, AnalysisKind, CfgBuilder, CfgEdgeKind, Fact, Label,
    },
    syntax::{BinaryOperator, Expression, Statement, Variable},
    BlockKind, Error, Result,
};

fn bin(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::binary(op, left, right)
}

fn var(name: &str) -> Expression {
    Expression::var(name)
}

fn num(value: i64) -> Expression {
    Expression::constant(value)
}

fn a_plus_b() -> Expression {
    bin(BinaryOperator::Add, var("a"), var("b"))
}

fn a_times_b() -> Expression {
    bin(BinaryOperator::Mul, var("a"), var("b"))
}

/// x := a + b; y := a * b; while (y > a + b) { a := a + 1; x := a + b }
fn book_example() -> Statement {
    Statement::sequence(vec![
        Statement::assign("x", a_plus_b()),
        Statement::assign("y", a_times_b()),
        Statement::while_loop(
            bin(BinaryOperator::Gt, var("y"), a_plus_b()),
            Statement::sequence(vec![
                Statement::assign("a", bin(BinaryOperator::Add, var("a"), num(1))),
                Statement::assign("x", a_plus_b()),
            ]),
        ),
    ])
}

/// x := 0; while (x < 10) { x := x + 1 }
fn counting_loop() -> Statement {
    Statement::sequence(vec![
        Statement::assign("x", num(0)),
        Statement::while_loop(
            bin(BinaryOperator::Lt, var("x"), num(10)),
            Statement::assign("x", bin(BinaryOperator::Add, var("x"), num(1))),
        ),
    ])
}

#[test]
fn test_book_example_graph() -> Result<()> {
    let cfg = CfgBuilder::build(&book_example())?;
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
    assert_eq!(cfg.entry_label(), s(1));
    assert_eq!(cfg.exit_labels(), &[s(3)]);
    assert!(cfg.is_back_edge(s(5), s(3)));
    assert!(!cfg.is_back_edge(s(3), s(4)));

    // Kinds are checked per labelled edge; the listing follows insertion
    // order, which differs from the depth-first order of `edges()`.
    let kinds = cfg.edges_with_kind();
    let expected = [
        (s(1), s(2), CfgEdgeKind::Sequential),
        (s(2), s(3), CfgEdgeKind::Sequential),
        (s(3), s(4), CfgEdgeKind::ConditionalTrue),
        (s(4), s(5), CfgEdgeKind::Sequential),
        (s(5), s(3), CfgEdgeKind::BackEdge),
        (s(3), Label::Exit, CfgEdgeKind::ConditionalFalse),
    ];
    assert_eq!(kinds.len(), expected.len());
    for edge in &expected {
        assert!(kinds.contains(edge), "missing edge {edge:?}");
    }
    Ok(())
}

#[test]
fn test_book_example_available_expressions() -> Result<()> {
    let cfg = CfgBuilder::build(&book_example())?;
    let analysis = AvailableExpressions::new(&cfg);
    let results = DataFlowSolver::new(&analysis, &cfg).solve();

    let entry = |n| results.entry_state(Label::Stmt(n)).unwrap();
    let exit = |n| results.exit_state(Label::Stmt(n)).unwrap();

    assert!(entry(1).is_empty());
    assert!(analysis.is_available(exit(1), &a_plus_b()));
    assert!(analysis.is_available(exit(2), &a_times_b()));
    // The back edge from 5 carries only a + b, so a * b is gone at the test.
    assert!(analysis.is_available(entry(3), &a_plus_b()));
    assert!(!analysis.is_available(entry(3), &a_times_b()));
    assert!(exit(4).is_empty());
    assert_eq!(analysis.expressions(exit(5)), vec![&a_plus_b()]);
    Ok(())
}

#[test]
fn test_first_pass_is_optimistic_at_loop_test() -> Result<()> {
    let cfg = CfgBuilder::build(&book_example())?;
    let analysis = AvailableExpressions::new(&cfg);
    let mut solver = DataFlowSolver::new(&analysis, &cfg);
    let test = cfg.node_id(Label::Stmt(3)).unwrap();

    // Before the body has been visited its exit state is still "everything",
    // so the first pass lets a * b through the back edge.
    assert!(solver.pass());
    assert!(analysis.is_available(&solver.in_states()[test.index()], &a_times_b()));

    while solver.pass() {}
    assert!(!analysis.is_available(&solver.in_states()[test.index()], &a_times_b()));
    Ok(())
}

#[test]
fn test_reaching_definitions_through_back_edge() -> Result<()> {
    let cfg = CfgBuilder::build(&counting_loop())?;
    let analysis = ReachingDefinitions::new(&cfg);
    let results = DataFlowSolver::new(&analysis, &cfg).solve();

    let at_test = results.entry_state(Label::Stmt(2)).unwrap();
    assert!(analysis.reaches(at_test, Label::Stmt(1)));
    assert!(analysis.reaches(at_test, Label::Stmt(3)));

    let after_body = results.exit_state(Label::Stmt(3)).unwrap();
    assert!(!analysis.reaches(after_body, Label::Stmt(1)));
    assert_eq!(
        analysis.definitions(after_body),
        vec![(Label::Stmt(3), &Variable::new("x"))]
    );
    Ok(())
}

#[test]
fn test_loop_at_entry_meets_boundary_with_back_edge() -> Result<()> {
    // while (x < 3) { x := x + 1 }
    let program = Statement::while_loop(
        bin(BinaryOperator::Lt, var("x"), num(3)),
        Statement::assign("x", bin(BinaryOperator::Add, var("x"), num(1))),
    );
    let cfg = CfgBuilder::build(&program)?;
    assert_eq!(cfg.entry_label(), Label::Stmt(1));

    let analysis = ReachingDefinitions::new(&cfg);
    let results = DataFlowSolver::new(&analysis, &cfg).solve();
    assert_eq!(
        analysis.definitions(results.entry_state(Label::Stmt(1)).unwrap()),
        vec![(Label::Stmt(2), &Variable::new("x"))]
    );

    // The empty boundary keeps available expressions empty at the entry.
    let analysis = AvailableExpressions::new(&cfg);
    let results = DataFlowSolver::new(&analysis, &cfg).solve();
    assert!(results.entry_state(Label::Stmt(1)).unwrap().is_empty());
    Ok(())
}

#[test]
fn test_live_variables_in_loop() -> Result<()> {
    // a := 0; while (a < n) { s := s + a; a := a + 1 }; r := s
    let program = Statement::sequence(vec![
        Statement::assign("a", num(0)),
        Statement::while_loop(
            bin(BinaryOperator::Lt, var("a"), var("n")),
            Statement::sequence(vec![
                Statement::assign("s", bin(BinaryOperator::Add, var("s"), var("a"))),
                Statement::assign("a", bin(BinaryOperator::Add, var("a"), num(1))),
            ]),
        ),
        Statement::assign("r", var("s")),
    ]);
    let cfg = CfgBuilder::build(&program)?;
    let analysis = LiveVariables::new(&cfg);
    let results = DataFlowSolver::new(&analysis, &cfg).solve();

    let names = |state| {
        analysis
            .variables(state)
            .into_iter()
            .map(Variable::name)
            .collect::<Vec<_>>()
    };

    assert_eq!(names(results.entry_state(Label::Stmt(1)).unwrap()), vec!["n", "s"]);
    assert_eq!(names(results.entry_state(Label::Stmt(2)).unwrap()), vec!["a", "n", "s"]);
    assert_eq!(names(results.exit_state(Label::Stmt(3)).unwrap()), vec!["a", "n", "s"]);
    assert_eq!(names(results.entry_state(Label::Stmt(5)).unwrap()), vec!["s"]);
    assert!(results.exit_state(Label::Stmt(5)).unwrap().is_empty());
    Ok(())
}

#[test]
fn test_strategies_reach_same_fixpoint() -> Result<()> {
    let cfg = CfgBuilder::build(&book_example())?;

    let analysis = ReachingDefinitions::new(&cfg);
    let gauss = DataFlowSolver::new(&analysis, &cfg).solve();
    let jacobi = DataFlowSolver::new(&analysis, &cfg)
        .with_strategy(IterationStrategy::Jacobi)
        .solve();
    assert_eq!(gauss.in_states, jacobi.in_states);
    assert_eq!(gauss.out_states, jacobi.out_states);
    assert!(gauss.passes() <= jacobi.passes());

    let analysis = LiveVariables::new(&cfg);
    let gauss = DataFlowSolver::new(&analysis, &cfg).solve();
    let jacobi = DataFlowSolver::new(&analysis, &cfg)
        .with_strategy(IterationStrategy::Jacobi)
        .solve();
    assert_eq!(gauss.in_states, jacobi.in_states);
    Ok(())
}

#[test]
fn test_empty_loop_body_is_rejected() {
    let program = Statement::while_loop(var("x"), Statement::sequence(vec![]));
    assert!(matches!(
        CfgBuilder::build(&program),
        Err(Error::EmptyBlock {
            block: BlockKind::LoopBody
        })
    ));
}

#[test]
fn test_empty_branch_is_rejected() {
    let program = Statement::if_then_else(
        var("c"),
        Statement::skip(),
        Statement::sequence(vec![]),
    );
    assert!(matches!(
        analyze(&program, &AnalysisConfig::default()),
        Err(Error::EmptyBlock {
            block: BlockKind::FalseBranch
        })
    ));
}

#[test]
fn test_empty_variable_name_is_rejected() {
    let program = Statement::assign("", num(1));
    assert!(matches!(CfgBuilder::build(&program), Err(Error::InvalidProgram(_))));
}

#[test]
fn test_single_statement_program() -> Result<()> {
    let report = analyze(
        &Statement::skip(),
        &AnalysisConfig::new(AnalysisKind::ReachingDefinitions),
    )?;
    assert_eq!(report.edges(), &[(Label::Stmt(1), Label::Exit)]);
    assert_eq!(report.entry(Label::Exit), Some(&[][..]));
    assert!(report.warnings().is_empty());
    Ok(())
}

#[test]
fn test_report_for_every_analysis() -> Result<()> {
    let cfg = CfgBuilder::build(&book_example())?;

    let available = analyze_graph(&cfg, &AnalysisConfig::default());
    assert_eq!(
        available.entry(Label::Stmt(3)),
        Some(&[Fact::Expression(a_plus_b())][..])
    );

    let reaching = analyze_graph(&cfg, &AnalysisConfig::new(AnalysisKind::ReachingDefinitions));
    assert!(reaching
        .entry(Label::Exit)
        .unwrap()
        .contains(&Fact::Definition {
            label: Label::Stmt(4),
            variable: Variable::new("a"),
        }));

    let live = analyze_graph(&cfg, &AnalysisConfig::new(AnalysisKind::LiveVariables));
    assert_eq!(
        live.entry(Label::Stmt(1)),
        Some(&[Fact::Variable(Variable::new("a")), Fact::Variable(Variable::new("b"))][..])
    );

    let text = live.to_string();
    assert!(text.starts_with("live-variables"));
    assert!(text.contains("    1  entry {a, b}"));
    Ok(())
}
