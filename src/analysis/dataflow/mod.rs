//! Data flow analysis framework.
//!
//! This module provides a generic framework for computing properties that
//! propagate along control flow edges. It supports both forward and backward
//! analyses using a chaotic-iteration solver.
//!
//! # Architecture
//!
//! The framework is built around three core abstractions:
//!
//! - **Lattice**: Defines the domain of abstract values with meet/join operations
//! - **Analysis**: Specifies transfer functions and boundary conditions
//! - **Solver**: Iteratively computes fixpoints in full passes over the graph
//!
//! Per-node facts never live on the graph: gen/kill sets are precomputed by
//! each analysis, and entry/exit states are owned by the solver and returned
//! as [`AnalysisResults`].
//!
//! # Analyses Provided
//!
//! - [`AvailableExpressions`]: Expressions computed on every path and not invalidated since
//! - [`ReachingDefinitions`]: Tracks which assignments may reach each program point
//! - [`LiveVariables`]: Determines which variables are live at each program point
//!
//! # Example
//!
//! ```rust
//! use whileflow::{
//!     analysis::{
//!         dataflow::{AvailableExpressions, DataFlowSolver},
//!         CfgBuilder, Label,
//!     },
//!     syntax::{BinaryOperator, Expression, Statement},
//! };
//!
//! let a_times_b = Expression::binary(BinaryOperator::Mul, Expression::var("a"), Expression::var("b"));
//! let program = Statement::sequence(vec![
//!     Statement::assign("y", a_times_b.clone()),
//!     Statement::while_loop(
//!         Expression::binary(BinaryOperator::Gt, Expression::var("y"), Expression::constant(0)),
//!         Statement::assign("a", Expression::constant(0)),
//!     ),
//! ]);
//!
//! let cfg = CfgBuilder::build(&program)?;
//! let analysis = AvailableExpressions::new(&cfg);
//! let results = DataFlowSolver::new(&analysis, &cfg).solve();
//!
//! for label in results.labels() {
//!     if let Some(state) = results.exit_state(*label) {
//!         println!("{label}: {:?}", analysis.expressions(state));
//!     }
//! }
//!
//! // `a := 0` on the back edge invalidates a * b at the loop test.
//! let at_test = results.entry_state(Label::Stmt(2)).map(|s| analysis.is_available(s, &a_times_b));
//! assert_eq!(at_test, Some(false));
//! # Ok::<(), whileflow::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are `Send` and `Sync`.

mod available;
mod framework;
mod lattice;
mod liveness;
mod reaching;
mod solver;

// Re-export primary types
pub use available::{AvailableExpressions, AvailableExprsResult, ExpressionScope};
pub use framework::{AnalysisResults, AnalysisWarning, DataFlowAnalysis, Direction, GenKill};
pub use lattice::{JoinSemiLattice, Lattice, MeetSemiLattice};
pub use liveness::{LiveVariables, LivenessResult};
pub use reaching::{ReachingDefinitions, ReachingDefsResult};
pub use solver::{DataFlowSolver, IterationStrategy};
