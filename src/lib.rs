// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # whileflow
//!
//! Control flow graphs and monotone data flow analysis for the WHILE language,
//! the small imperative language of assignments, sequences, `while` loops and
//! `if`/`else` used throughout the program analysis literature.
//!
//! ## Features
//!
//! - **🏷️ Labelled control flow graphs** - One node per assignment, `skip` and test, numbered in program order
//! - **🔁 Generic fixpoint solver** - Chaotic iteration over any meet semi-lattice, forward or backward
//! - **⚡ Parallel passes** - Jacobi iteration evaluates the nodes of a pass in parallel
//! - **📊 Classic analyses** - Available expressions, reaching definitions and live variables
//!
//! ## Quick Start
//!
//! ### Using the Prelude
//!
//! ```rust
//! use whileflow::prelude::*;
//!
//! // x := 0; while (x < 10) { x := x + 1 }
//! let program = Statement::sequence(vec![
//!     Statement::assign("x", Expression::constant(0)),
//!     Statement::while_loop(
//!         Expression::binary(BinaryOperator::Lt, Expression::var("x"), Expression::constant(10)),
//!         Statement::assign(
//!             "x",
//!             Expression::binary(BinaryOperator::Add, Expression::var("x"), Expression::constant(1)),
//!         ),
//!     ),
//! ]);
//!
//! let report = analyze(&program, &AnalysisConfig::new(AnalysisKind::ReachingDefinitions))?;
//! println!("{report}");
//! # Ok::<(), whileflow::Error>(())
//! ```
//!
//! ### Driving the Solver Directly
//!
//! ```rust
//! use whileflow::{
//!     analysis::{
//!         dataflow::{DataFlowSolver, LiveVariables},
//!         CfgBuilder, Label,
//!     },
//!     syntax::{Expression, Statement, Variable},
//! };
//!
//! let program = Statement::sequence(vec![
//!     Statement::assign("x", Expression::constant(1)),
//!     Statement::assign("y", Expression::var("x")),
//! ]);
//! let cfg = CfgBuilder::build(&program)?;
//! let analysis = LiveVariables::new(&cfg);
//! let results = DataFlowSolver::new(&analysis, &cfg).solve();
//!
//! let live = results.exit_state(Label::Stmt(1)).map(|s| analysis.is_live(s, &Variable::new("x")));
//! assert_eq!(live, Some(true));
//! # Ok::<(), whileflow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`syntax`] - The program tree: expressions, statements and operators
//! - [`analysis`] - Graph construction, the data flow framework and reporting
//! - [`utils`] - Bit sets and the generic directed graph
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber. Graph
//! construction and solver convergence log at `debug`, individual passes at
//! `trace`, and unreachable nodes at `warn`.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use whileflow::prelude::*;
///
/// let program = Statement::assign("x", Expression::constant(1));
/// let cfg = CfgBuilder::build(&program)?;
/// assert_eq!(cfg.node_count(), 2);
/// # Ok::<(), whileflow::Error>(())
/// ```
pub mod prelude;

/// Abstract syntax of WHILE programs.
pub mod syntax;

/// Control flow graph construction and data flow analysis.
///
/// See [`analysis::analyze`] for the one-call entry point, and
/// [`analysis::dataflow`] for the framework to write new analyses.
pub mod analysis;

/// Generic data structures used by the analyses.
pub mod utils;

/// `whileflow` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `whileflow` Error type
///
/// Every error is raised while building a control flow graph; see [`Error`]
/// for the categories.
pub use error::{BlockKind, Error};

/// Builds the control flow graph of a program and runs one analysis over it.
///
/// See [`analysis::analyze`].
pub use analysis::analyze;
