//! Abstract syntax of the WHILE language.
//!
//! Programs are built directly as typed trees; there is no parser. Both
//! [`Expression`] and [`Statement`] are closed sum types with structural
//! equality and hashing, so analyses can store them in sets and maps and
//! every consumer matches exhaustively over their variants.
//!
//! # Example
//!
//! ```rust
//! use whileflow::syntax::{BinaryOperator::*, Expression, Statement};
//!
//! // if (x < 5) { y := 1 } else { y := 0 }
//! let program = Statement::if_then_else(
//!     Expression::binary(Lt, Expression::var("x"), Expression::constant(5)),
//!     Statement::assign("y", Expression::constant(1)),
//!     Statement::assign("y", Expression::constant(0)),
//! );
//! assert_eq!(program.label_count(), 3);
//! ```

mod expr;
mod ops;
mod stmt;

pub use expr::{Expression, Variable};
pub use ops::BinaryOperator;
pub use stmt::Statement;
