//! Analysis selection.
//!
//! [`AnalysisConfig`] is the only configuration the crate knows: which
//! analysis to run and how the solver iterates. It is a plain value; there is
//! no file or environment based configuration.

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::analysis::dataflow::{ExpressionScope, IterationStrategy};

/// The concrete data flow analyses that [`crate::analysis::analyze`] can run.
///
/// Kinds display as, and parse from, kebab-case names:
///
/// ```rust
/// use whileflow::analysis::AnalysisKind;
///
/// let kind: AnalysisKind = "reaching-definitions".parse()?;
/// assert_eq!(kind, AnalysisKind::ReachingDefinitions);
/// assert_eq!(AnalysisKind::LiveVariables.to_string(), "live-variables");
/// # Ok::<(), strum::ParseError>(())
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum AnalysisKind {
    /// Forward must-analysis of binary expressions.
    #[default]
    AvailableExpressions,
    /// Forward may-analysis of assignments.
    ReachingDefinitions,
    /// Backward may-analysis of variables.
    LiveVariables,
}

/// Configuration of one analysis run.
///
/// # Examples
///
/// ```rust
/// use whileflow::analysis::{
///     AnalysisConfig, AnalysisKind, ExpressionScope, IterationStrategy,
/// };
///
/// let config = AnalysisConfig::new(AnalysisKind::AvailableExpressions)
///     .with_strategy(IterationStrategy::Jacobi)
///     .with_expression_scope(ExpressionScope::Nested);
///
/// assert_eq!(config.strategy, IterationStrategy::Jacobi);
/// assert_eq!(AnalysisConfig::default().kind, AnalysisKind::AvailableExpressions);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AnalysisConfig {
    /// The analysis to run
    pub kind: AnalysisKind,
    /// How the solver iterates
    pub strategy: IterationStrategy,
    /// Which expressions available expressions tracks; ignored by the other analyses
    pub expression_scope: ExpressionScope,
}

impl AnalysisConfig {
    /// Creates a configuration for `kind` with default solver settings.
    #[must_use]
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Sets the iteration strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: IterationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the expression scope of available expressions.
    #[must_use]
    pub const fn with_expression_scope(mut self, scope: ExpressionScope) -> Self {
        self.expression_scope = scope;
        self
    }
}
