use strum::{AsRefStr, Display};
use thiserror::Error;

macro_rules! invalid_program {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidProgram($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidProgram(format!($fmt, $($arg)*))
    };
}

/// The place in a program where an empty statement block was found.
///
/// Loop bodies and both branches of a conditional must contain at least one
/// statement (an empty branch is written as a single `skip`), and a
/// compound statement must not be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum BlockKind {
    /// A compound statement (statement sequence).
    #[strum(serialize = "statement sequence")]
    Sequence,
    /// The body of a `while` loop.
    #[strum(serialize = "loop body")]
    LoopBody,
    /// The `then` branch of a conditional.
    #[strum(serialize = "true branch")]
    TrueBranch,
    /// The `else` branch of a conditional.
    #[strum(serialize = "false branch")]
    FalseBranch,
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// All errors are raised while building the control flow graph. Once a graph has been
/// built, the data flow solver never fails: conditions such as unreachable nodes are
/// reported as [`crate::analysis::AnalysisWarning`]s alongside a conservative result.
///
/// # Error Categories
///
/// - [`Error::InvalidProgram`] - The program tree is not a well-formed WHILE program
/// - [`Error::EmptyBlock`] - A sequence, loop body or branch contains no statements
/// - [`Error::GraphError`] - Internal graph construction failure
///
/// # Examples
///
/// ```rust
/// use whileflow::{analysis::CfgBuilder, syntax::{Expression, Statement}, BlockKind, Error};
///
/// let program = Statement::while_loop(
///     Expression::var("x"),
///     Statement::sequence(vec![]),
/// );
///
/// match CfgBuilder::build(&program) {
///     Err(Error::EmptyBlock { block }) => assert_eq!(block, BlockKind::LoopBody),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The value handed to the builder is not a valid WHILE program.
    ///
    /// Raised for trees that cannot be given a meaning, such as an assignment
    /// to a variable with an empty name. No partial graph is returned.
    #[error("Invalid program - {0}")]
    InvalidProgram(String),

    /// A compound statement, loop body or conditional branch has no statements.
    ///
    /// Construction stops at the offending block; no partial graph is returned.
    #[error("Empty {block} - blocks must contain at least one statement")]
    EmptyBlock {
        /// Where the empty block was found
        block: BlockKind,
    },

    /// Control flow graph error.
    ///
    /// Raised when an edge refers to a node that does not exist, or when the
    /// label space is exhausted.
    #[error("{0}")]
    GraphError(String),
}
