//! Arithmetic and boolean expressions.

use std::{collections::BTreeSet, fmt};

use crate::{syntax::BinaryOperator, Result};

/// A program variable.
///
/// Variables are compared and hashed by name, so two independently created
/// `Variable`s with the same name denote the same program variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    /// Creates a variable with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Variable(name.into())
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.0.trim().is_empty() {
            return Err(invalid_program!("variable names must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Variable::new(name)
    }
}

impl From<String> for Variable {
    fn from(name: String) -> Self {
        Variable(name)
    }
}

/// An expression tree.
///
/// Expressions are immutable values with structural equality: two trees are
/// equal, and hash equally, iff they have the same shape, operators, names and
/// constants. Analyses rely on this to key sets and maps by expression.
///
/// # Examples
///
/// ```rust
/// use whileflow::syntax::{BinaryOperator, Expression, Variable};
///
/// let a_plus_b = Expression::binary(BinaryOperator::Add, Expression::var("a"), Expression::var("b"));
/// let again = Expression::binary(BinaryOperator::Add, Expression::var("a"), Expression::var("b"));
///
/// assert_eq!(a_plus_b, again);
/// assert!(a_plus_b.mentions(&Variable::new("b")));
/// assert_eq!(a_plus_b.to_string(), "a + b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expression {
    /// A variable read.
    Variable(Variable),
    /// An integer literal.
    Constant(i64),
    /// `left op right`
    BinaryOperation {
        /// The operator
        op: BinaryOperator,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
    },
}

impl Expression {
    /// Creates a variable expression.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Expression::Variable(Variable::new(name))
    }

    /// Creates an integer literal.
    #[must_use]
    pub const fn constant(value: i64) -> Self {
        Expression::Constant(value)
    }

    /// Creates a binary operation.
    #[must_use]
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOperation {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns `true` if this is a [`Expression::BinaryOperation`].
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Expression::BinaryOperation { .. })
    }

    /// Returns `true` if `var` occurs anywhere in the expression.
    #[must_use]
    pub fn mentions(&self, var: &Variable) -> bool {
        match self {
            Expression::Variable(v) => v == var,
            Expression::Constant(_) => false,
            Expression::BinaryOperation { left, right, .. } => {
                left.mentions(var) || right.mentions(var)
            }
        }
    }

    /// Returns the set of variables read by the expression.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&Variable> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables<'a>(&'a self, vars: &mut BTreeSet<&'a Variable>) {
        match self {
            Expression::Variable(v) => {
                vars.insert(v);
            }
            Expression::Constant(_) => {}
            Expression::BinaryOperation { left, right, .. } => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
        }
    }

    /// Returns every binary operation in the tree, including `self`, operands
    /// before the operation that uses them. Duplicates are kept.
    #[must_use]
    pub fn binary_subexpressions(&self) -> Vec<&Expression> {
        let mut found = Vec::new();
        self.collect_binary(&mut found);
        found
    }

    fn collect_binary<'a>(&'a self, found: &mut Vec<&'a Expression>) {
        if let Expression::BinaryOperation { left, right, .. } = self {
            left.collect_binary(found);
            right.collect_binary(found);
            found.push(self);
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Expression::Variable(v) => v.validate(),
            Expression::Constant(_) => Ok(()),
            Expression::BinaryOperation { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
        }
    }

    fn fmt_with_precedence(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        match self {
            Expression::Variable(v) => write!(f, "{v}"),
            Expression::Constant(c) => write!(f, "{c}"),
            Expression::BinaryOperation { op, left, right } => {
                let own = op.precedence();
                let wrap = own < parent;
                if wrap {
                    f.write_str("(")?;
                }
                left.fmt_with_precedence(f, own)?;
                write!(f, " {op} ")?;
                // Operators are left-associative: an equal-precedence right operand needs parentheses.
                right.fmt_with_precedence(f, own + 1)?;
                if wrap {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_precedence(f, 0)
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Self {
        Expression::Variable(var)
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::Constant(value)
    }
}
