//! Program analysis for WHILE programs.
//!
//! This module turns a program tree into a control flow graph and runs data
//! flow analyses over it. It builds upon the generic graph infrastructure in
//! [`crate::utils::graph`] to provide the domain-specific pieces.
//!
//! # Architecture
//!
//! The analysis module is organized into focused sub-modules:
//!
//! - [`cfg`] - Labelled control flow graph construction
//! - [`dataflow`] - Lattices, the chaotic-iteration solver and the concrete analyses
//!
//! [`analyze`] ties both together: it builds the graph, runs the analysis
//! selected by an [`AnalysisConfig`] and returns an [`AnalysisReport`] keyed by
//! statement label.
//!
//! # Usage
//!
//! ```rust
//! use whileflow::{
//!     analysis::{analyze, AnalysisConfig, AnalysisKind, Fact, Label},
//!     syntax::{BinaryOperator, Expression, Statement},
//! };
//!
//! let a_plus_b = Expression::binary(BinaryOperator::Add, Expression::var("a"), Expression::var("b"));
//! let program = Statement::sequence(vec![
//!     Statement::assign("x", a_plus_b.clone()),
//!     Statement::assign("y", a_plus_b.clone()),
//! ]);
//!
//! let report = analyze(&program, &AnalysisConfig::new(AnalysisKind::AvailableExpressions))?;
//! assert_eq!(report.entry(Label::Stmt(2)), Some(&[Fact::Expression(a_plus_b)][..]));
//! # Ok::<(), whileflow::Error>(())
//! ```

pub mod cfg;
pub mod dataflow;

mod config;
mod report;

use tracing::debug;

use crate::{
    analysis::dataflow::{
        AvailableExpressions, DataFlowAnalysis, DataFlowSolver, LiveVariables, ReachingDefinitions,
    },
    syntax::Statement,
    Result,
};

// Re-export primary types at module level
pub use cfg::{CfgBuilder, CfgEdgeKind, CfgNode, ControlFlowGraph, Label, NodePayload};
pub use config::{AnalysisConfig, AnalysisKind};
pub use dataflow::{AnalysisWarning, ExpressionScope, IterationStrategy};
pub use report::{AnalysisReport, Fact, NodeFacts};

/// Builds the control flow graph of `program` and runs the configured analysis.
///
/// # Errors
///
/// Returns the errors of [`CfgBuilder::build`]: [`crate::Error::EmptyBlock`]
/// for an empty statement block and [`crate::Error::InvalidProgram`] for a
/// malformed program tree. Solving itself never fails.
pub fn analyze(program: &Statement, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let cfg = CfgBuilder::build(program)?;
    Ok(analyze_graph(&cfg, config))
}

/// Runs the configured analysis on an already built graph.
#[must_use]
pub fn analyze_graph(cfg: &ControlFlowGraph, config: &AnalysisConfig) -> AnalysisReport {
    debug!(kind = %config.kind, strategy = %config.strategy, "running analysis");

    match config.kind {
        AnalysisKind::AvailableExpressions => {
            let analysis = AvailableExpressions::with_scope(cfg, config.expression_scope);
            solve_and_report(config, cfg, &analysis, |state| {
                analysis
                    .expressions(state)
                    .into_iter()
                    .map(|expr| Fact::Expression(expr.clone()))
                    .collect()
            })
        }
        AnalysisKind::ReachingDefinitions => {
            let analysis = ReachingDefinitions::new(cfg);
            solve_and_report(config, cfg, &analysis, |state| {
                analysis
                    .definitions(state)
                    .into_iter()
                    .map(|(label, variable)| Fact::Definition {
                        label,
                        variable: variable.clone(),
                    })
                    .collect()
            })
        }
        AnalysisKind::LiveVariables => {
            let analysis = LiveVariables::new(cfg);
            solve_and_report(config, cfg, &analysis, |state| {
                analysis
                    .variables(state)
                    .into_iter()
                    .map(|var| Fact::Variable(var.clone()))
                    .collect()
            })
        }
    }
}

fn solve_and_report<A>(
    config: &AnalysisConfig,
    cfg: &ControlFlowGraph,
    analysis: &A,
    describe: impl Fn(&A::Lattice) -> Vec<Fact>,
) -> AnalysisReport
where
    A: DataFlowAnalysis + Sync,
    A::Lattice: Send + Sync,
{
    let results = DataFlowSolver::new(analysis, cfg)
        .with_strategy(config.strategy)
        .solve();
    AnalysisReport::new(config.kind, cfg, &results, describe)
}
