//! Control flow edge kinds for the CFG.
//!
//! Edges carry no data beyond their classification. The classification is not
//! needed by the data flow solver, which only follows adjacency, but it makes
//! loop structure and branch polarity visible to tests and reports.

use strum::{AsRefStr, Display};

/// The kind of control flow represented by an edge.
///
/// # Examples
///
/// ```rust
/// use whileflow::analysis::CfgEdgeKind;
///
/// assert!(CfgEdgeKind::ConditionalFalse.is_conditional());
/// assert!(CfgEdgeKind::BackEdge.is_back_edge());
/// assert_eq!(CfgEdgeKind::Sequential.to_string(), "sequential");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CfgEdgeKind {
    /// Fall-through from one statement to the next one in a sequence.
    Sequential,

    /// From a test to the code run when it holds: a loop body or a `then` branch.
    ConditionalTrue,

    /// From a test to the code run when it fails: an `else` branch, or the
    /// statement following a loop.
    ConditionalFalse,

    /// From the end of a loop body back to the loop test.
    ///
    /// An edge closing a loop is a back edge even when it leaves a nested test.
    BackEdge,
}

impl CfgEdgeKind {
    /// Returns `true` for edges leaving a test.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::ConditionalTrue | Self::ConditionalFalse)
    }

    /// Returns `true` for edges closing a loop.
    #[must_use]
    pub const fn is_back_edge(self) -> bool {
        matches!(self, Self::BackEdge)
    }
}
