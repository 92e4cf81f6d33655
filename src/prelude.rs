//! # whileflow Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the whileflow library. Import this module to get quick access to the essential
//! types for building and analysing WHILE programs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all whileflow operations
pub use crate::Error;

/// The result type used throughout whileflow
pub use crate::Result;

/// The kind of an empty statement block
pub use crate::BlockKind;

// ================================================================================================
// Program Syntax
// ================================================================================================

/// Expressions, statements and operators of the WHILE language
pub use crate::syntax::{BinaryOperator, Expression, Statement, Variable};

// ================================================================================================
// Control Flow Graph
// ================================================================================================

/// Graph construction and the labelled graph itself
pub use crate::analysis::{CfgBuilder, CfgEdgeKind, CfgNode, ControlFlowGraph, Label, NodePayload};

// ================================================================================================
// Analysis Entry Points
// ================================================================================================

/// One-call analysis and its configuration
pub use crate::analysis::{analyze, analyze_graph, AnalysisConfig, AnalysisKind};

/// Label-keyed analysis output
pub use crate::analysis::{AnalysisReport, AnalysisWarning, Fact, NodeFacts};

// ================================================================================================
// Data Flow Framework
// ================================================================================================

/// Lattice traits for custom analyses
pub use crate::analysis::dataflow::{JoinSemiLattice, Lattice, MeetSemiLattice};

/// Analysis trait, solver and solver results
pub use crate::analysis::dataflow::{
    AnalysisResults, DataFlowAnalysis, DataFlowSolver, Direction, GenKill, IterationStrategy,
};

/// The provided analyses
pub use crate::analysis::dataflow::{
    AvailableExpressions, ExpressionScope, LiveVariables, ReachingDefinitions,
};

// ================================================================================================
// Utilities
// ================================================================================================

/// Dense bit set used by the set-valued lattices
pub use crate::utils::BitSet;

/// Graph identifiers
pub use crate::utils::graph::{EdgeId, NodeId};
