//! Statements of the WHILE language.

use std::{collections::BTreeSet, fmt};

use crate::{
    syntax::{Expression, Variable},
    Result,
};

/// A statement tree.
///
/// Like [`Expression`], statements compare and hash structurally. Empty blocks
/// can be represented (`CompoundStatement(vec![])`) but are rejected when the
/// control flow graph is built; write `skip` for an intentionally empty branch.
///
/// # Examples
///
/// ```rust
/// use whileflow::syntax::{BinaryOperator, Expression, Statement};
///
/// // x := 0; while (x < 10) { x := x + 1 }
/// let program = Statement::sequence(vec![
///     Statement::assign("x", Expression::constant(0)),
///     Statement::while_loop(
///         Expression::binary(BinaryOperator::Lt, Expression::var("x"), Expression::constant(10)),
///         Statement::assign(
///             "x",
///             Expression::binary(BinaryOperator::Add, Expression::var("x"), Expression::constant(1)),
///         ),
///     ),
/// ]);
///
/// assert_eq!(program.assigned_variables().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statement {
    /// `skip`
    Skip,
    /// `variable := expression`
    Assignment {
        /// The assigned variable
        variable: Variable,
        /// The assigned value
        expression: Expression,
    },
    /// `s1; s2; ...; sn`
    CompoundStatement(Vec<Statement>),
    /// `while (condition) { body }`
    WhileLoop {
        /// The loop test
        condition: Expression,
        /// The loop body
        body: Box<Statement>,
    },
    /// `if (condition) { true_branch } else { false_branch }`
    IfThenElse {
        /// The branch test
        condition: Expression,
        /// Executed when the test holds
        true_branch: Box<Statement>,
        /// Executed otherwise
        false_branch: Box<Statement>,
    },
}

impl Statement {
    /// Creates a `skip` statement.
    #[must_use]
    pub const fn skip() -> Self {
        Statement::Skip
    }

    /// Creates an assignment.
    #[must_use]
    pub fn assign(variable: impl Into<Variable>, expression: Expression) -> Self {
        Statement::Assignment {
            variable: variable.into(),
            expression,
        }
    }

    /// Creates a statement sequence.
    #[must_use]
    pub fn sequence(statements: Vec<Statement>) -> Self {
        Statement::CompoundStatement(statements)
    }

    /// Creates a `while` loop.
    #[must_use]
    pub fn while_loop(condition: Expression, body: Statement) -> Self {
        Statement::WhileLoop {
            condition,
            body: Box::new(body),
        }
    }

    /// Creates a conditional.
    #[must_use]
    pub fn if_then_else(condition: Expression, true_branch: Statement, false_branch: Statement) -> Self {
        Statement::IfThenElse {
            condition,
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
        }
    }

    /// Returns every variable assigned somewhere in the statement.
    #[must_use]
    pub fn assigned_variables(&self) -> BTreeSet<&Variable> {
        let mut vars = BTreeSet::new();
        self.visit(&mut |stmt| {
            if let Statement::Assignment { variable, .. } = stmt {
                vars.insert(variable);
            }
        });
        vars
    }

    /// Returns the number of elementary statements and tests, which is the
    /// number of labelled nodes the control flow graph will contain.
    #[must_use]
    pub fn label_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |stmt| {
            if !matches!(stmt, Statement::CompoundStatement(_)) {
                count += 1;
            }
        });
        count
    }

    /// Calls `f` on every statement of the tree in pre-order.
    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Statement)) {
        f(self);
        match self {
            Statement::Skip | Statement::Assignment { .. } => {}
            Statement::CompoundStatement(statements) => {
                for stmt in statements {
                    stmt.visit(f);
                }
            }
            Statement::WhileLoop { body, .. } => body.visit(f),
            Statement::IfThenElse {
                true_branch,
                false_branch,
                ..
            } => {
                true_branch.visit(f);
                false_branch.visit(f);
            }
        }
    }

    /// Checks the statement's own variable and expressions, not its children.
    pub(crate) fn validate_shallow(&self) -> Result<()> {
        match self {
            Statement::Skip | Statement::CompoundStatement(_) => Ok(()),
            Statement::Assignment {
                variable,
                expression,
            } => {
                variable.validate()?;
                expression.validate()
            }
            Statement::WhileLoop { condition, .. } | Statement::IfThenElse { condition, .. } => {
                condition.validate()
            }
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "    ".repeat(depth);
        match self {
            Statement::Skip => writeln!(f, "{pad}skip"),
            Statement::Assignment {
                variable,
                expression,
            } => writeln!(f, "{pad}{variable} := {expression}"),
            Statement::CompoundStatement(statements) => {
                for stmt in statements {
                    stmt.fmt_indented(f, depth)?;
                }
                Ok(())
            }
            Statement::WhileLoop { condition, body } => {
                writeln!(f, "{pad}while ({condition}) {{")?;
                body.fmt_indented(f, depth + 1)?;
                writeln!(f, "{pad}}}")
            }
            Statement::IfThenElse {
                condition,
                true_branch,
                false_branch,
            } => {
                writeln!(f, "{pad}if ({condition}) {{")?;
                true_branch.fmt_indented(f, depth + 1)?;
                writeln!(f, "{pad}}} else {{")?;
                false_branch.fmt_indented(f, depth + 1)?;
                writeln!(f, "{pad}}}")
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
