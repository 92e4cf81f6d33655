//! Control flow graph nodes.

use std::fmt;

use crate::{
    analysis::cfg::Label,
    syntax::{Expression, Variable},
};

/// What a node does when control passes through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePayload {
    /// A `skip` statement.
    Skip,
    /// `variable := expression`
    Assignment {
        /// The assigned variable
        variable: Variable,
        /// The assigned value
        expression: Expression,
    },
    /// The test of a `while` loop or a conditional.
    Condition(Expression),
    /// The synthetic end of the program.
    Exit,
}

/// A labelled node of a [`crate::analysis::ControlFlowGraph`].
///
/// Nodes only describe the program point. Analysis facts (gen/kill sets and
/// entry/exit states) are owned by the analyses and the solver, keyed by the
/// node's [`crate::utils::graph::NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CfgNode {
    label: Label,
    payload: NodePayload,
}

impl CfgNode {
    /// Creates a node.
    #[must_use]
    pub const fn new(label: Label, payload: NodePayload) -> Self {
        Self { label, payload }
    }

    /// Returns the node label.
    #[must_use]
    pub const fn label(&self) -> Label {
        self.label
    }

    /// Returns the node payload.
    #[must_use]
    pub const fn payload(&self) -> &NodePayload {
        &self.payload
    }

    /// Returns the variable written by the node, if it is an assignment.
    #[must_use]
    pub fn assigned_variable(&self) -> Option<&Variable> {
        match &self.payload {
            NodePayload::Assignment { variable, .. } => Some(variable),
            _ => None,
        }
    }

    /// Returns the expression evaluated by the node: an assignment's right-hand
    /// side or a test condition.
    #[must_use]
    pub fn expression(&self) -> Option<&Expression> {
        match &self.payload {
            NodePayload::Assignment { expression, .. } | NodePayload::Condition(expression) => {
                Some(expression)
            }
            NodePayload::Skip | NodePayload::Exit => None,
        }
    }

    /// Returns `true` if the node is a loop or branch test.
    #[must_use]
    pub const fn is_condition(&self) -> bool {
        matches!(self.payload, NodePayload::Condition(_))
    }
}

impl fmt::Display for CfgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            NodePayload::Skip => write!(f, "{}: skip", self.label),
            NodePayload::Assignment {
                variable,
                expression,
            } => write!(f, "{}: {variable} := {expression}", self.label),
            NodePayload::Condition(condition) => write!(f, "{}: [{condition}]", self.label),
            NodePayload::Exit => write!(f, "{}", self.label),
        }
    }
}
