//! Control Flow Graph (CFG) construction.
//!
//! This module turns a structured [`crate::syntax::Statement`] tree into a
//! labelled graph of program points.
//!
//! # Architecture
//!
//! The CFG builds upon the generic [`crate::utils::graph::DirectedGraph`]
//! infrastructure, providing WHILE-specific node and edge types while
//! leveraging the shared traversals.
//!
//! # Key Components
//!
//! - [`CfgBuilder`] - Recursive construction from a statement tree
//! - [`ControlFlowGraph`] - The built graph, with label-based accessors
//! - [`CfgNode`] / [`NodePayload`] - One labelled program point
//! - [`CfgEdgeKind`] - Classification of edges (sequential, conditional, back edge)
//! - [`Label`] - Statement numbers plus the distinguished exit label
//!
//! # Shape of a Built Graph
//!
//! Every elementary statement (`skip`, assignment) and every loop or branch
//! test becomes one node. A single synthetic exit node with no payload is
//! added last and linked from every node that can finish the program, so each
//! graph has one entry and one exit.
//!
//! # Examples
//!
//! ```rust
//! use whileflow::{
//!     analysis::{CfgBuilder, Label},
//!     syntax::{BinaryOperator, Expression, Statement},
//! };
//!
//! let program = Statement::if_then_else(
//!     Expression::binary(BinaryOperator::Lt, Expression::var("x"), Expression::constant(5)),
//!     Statement::assign("y", Expression::constant(1)),
//!     Statement::skip(),
//! );
//! let cfg = CfgBuilder::build(&program)?;
//!
//! for (from, to) in cfg.edges() {
//!     println!("{from} -> {to}");
//! }
//! assert_eq!(cfg.exit_labels(), &[Label::Stmt(2), Label::Stmt(3)]);
//! # Ok::<(), whileflow::Error>(())
//! ```

mod builder;
mod edge;
mod graph;
mod label;
mod node;

pub use builder::CfgBuilder;
pub use edge::CfgEdgeKind;
pub use graph::ControlFlowGraph;
pub use label::Label;
pub use node::{CfgNode, NodePayload};
