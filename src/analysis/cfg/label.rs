//! Node labels.

use std::fmt;

/// The identifier of a control flow graph node.
///
/// Elementary statements and tests are numbered from 1 in the order the builder
/// creates them. The synthetic program exit is not numbered; it carries the
/// distinguished [`Label::Exit`], which sorts after every statement label.
///
/// # Examples
///
/// ```rust
/// use whileflow::analysis::Label;
///
/// assert!(Label::Stmt(7) < Label::Exit);
/// assert_eq!(Label::Stmt(3).to_string(), "3");
/// assert_eq!(Label::Exit.to_string(), "exit");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// A statement or test, numbered in creation order.
    Stmt(u32),
    /// The end of the program.
    Exit,
}

impl Label {
    /// Returns the statement number, or `None` for [`Label::Exit`].
    #[must_use]
    pub const fn number(self) -> Option<u32> {
        match self {
            Label::Stmt(n) => Some(n),
            Label::Exit => None,
        }
    }

    /// Returns `true` for the synthetic exit label.
    #[must_use]
    pub const fn is_exit(self) -> bool {
        matches!(self, Label::Exit)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Stmt(n) => write!(f, "{n}"),
            Label::Exit => f.write_str("exit"),
        }
    }
}
