//! Binary operators of the WHILE language.

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// A binary operator.
///
/// Operators display as, and parse from, their surface symbol:
///
/// ```rust
/// use std::str::FromStr;
/// use whileflow::syntax::BinaryOperator;
///
/// assert_eq!(BinaryOperator::Add.to_string(), "+");
/// assert_eq!(BinaryOperator::from_str("<=")?, BinaryOperator::Le);
/// # Ok::<(), strum::ParseError>(())
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
)]
pub enum BinaryOperator {
    /// Addition
    #[strum(serialize = "+")]
    Add,
    /// Subtraction
    #[strum(serialize = "-")]
    Sub,
    /// Multiplication
    #[strum(serialize = "*")]
    Mul,
    /// Division
    #[strum(serialize = "/")]
    Div,
    /// Remainder
    #[strum(serialize = "%")]
    Rem,
    /// Less than
    #[strum(serialize = "<")]
    Lt,
    /// Less than or equal
    #[strum(serialize = "<=")]
    Le,
    /// Greater than
    #[strum(serialize = ">")]
    Gt,
    /// Greater than or equal
    #[strum(serialize = ">=")]
    Ge,
    /// Equality
    #[strum(serialize = "==")]
    Eq,
    /// Inequality
    #[strum(serialize = "!=")]
    Ne,
    /// Logical and
    #[strum(serialize = "&&")]
    And,
    /// Logical or
    #[strum(serialize = "||")]
    Or,
}

impl BinaryOperator {
    /// Returns `true` for operators producing a truth value.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::Eq | Self::Ne | Self::And | Self::Or
        )
    }

    /// Binding strength used when printing; higher binds tighter.
    #[must_use]
    pub(crate) const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[test]
    fn test_symbols_roundtrip() {
        for op in BinaryOperator::iter() {
            assert_eq!(BinaryOperator::from_str(op.as_ref()).unwrap(), op);
        }
        assert_eq!(BinaryOperator::COUNT, 13);
        assert!(BinaryOperator::from_str("**").is_err());
    }

    #[test]
    fn test_relational() {
        assert!(BinaryOperator::Gt.is_relational());
        assert!(!BinaryOperator::Mul.is_relational());
        assert!(BinaryOperator::Mul.precedence() > BinaryOperator::Add.precedence());
    }
}
