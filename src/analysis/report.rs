//! Label-keyed analysis reports.
//!
//! Solver results are bit sets indexed by node; a report translates them back
//! into program terms (expressions, definitions, variables) keyed by
//! [`Label`], together with the edge list of the graph.

use std::{collections::BTreeMap, fmt};

use crate::{
    analysis::{
        cfg::{ControlFlowGraph, Label},
        dataflow::{AnalysisResults, AnalysisWarning},
        AnalysisKind,
    },
    syntax::{Expression, Variable},
};

/// One element of an analysis state, in program terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fact {
    /// An available expression.
    Expression(Expression),
    /// A reaching definition: the assignment at `label` to `variable`.
    Definition {
        /// Label of the assignment
        label: Label,
        /// The assigned variable
        variable: Variable,
    },
    /// A live variable.
    Variable(Variable),
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::Expression(expr) => write!(f, "{expr}"),
            Fact::Definition { label, variable } => write!(f, "({variable}, {label})"),
            Fact::Variable(var) => write!(f, "{var}"),
        }
    }
}

/// The states before and after one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFacts {
    /// Facts holding when control enters the node
    pub entry: Vec<Fact>,
    /// Facts holding when control leaves the node
    pub exit: Vec<Fact>,
}

/// The outcome of [`crate::analysis::analyze`].
///
/// # Examples
///
/// ```rust
/// use whileflow::{
///     analysis::{analyze, AnalysisConfig, AnalysisKind, Fact, Label},
///     syntax::{Expression, Statement, Variable},
/// };
///
/// let program = Statement::sequence(vec![
///     Statement::assign("x", Expression::constant(1)),
///     Statement::assign("y", Expression::var("x")),
/// ]);
/// let report = analyze(&program, &AnalysisConfig::new(AnalysisKind::LiveVariables))?;
///
/// assert_eq!(report.exit(Label::Stmt(1)), Some(&[Fact::Variable(Variable::new("x"))][..]));
/// assert_eq!(report.edges(), &[(Label::Stmt(1), Label::Stmt(2)), (Label::Stmt(2), Label::Exit)]);
/// println!("{report}");
/// # Ok::<(), whileflow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    kind: AnalysisKind,
    edges: Vec<(Label, Label)>,
    facts: BTreeMap<Label, NodeFacts>,
    passes: usize,
    warnings: Vec<AnalysisWarning>,
}

impl AnalysisReport {
    /// Translates solver results, describing each state with `describe`.
    pub(crate) fn new<L>(
        kind: AnalysisKind,
        cfg: &ControlFlowGraph,
        results: &AnalysisResults<L>,
        describe: impl Fn(&L) -> Vec<Fact>,
    ) -> Self {
        let facts = cfg
            .nodes()
            .map(|(id, node)| {
                let entry = results.in_state(id).map(&describe).unwrap_or_default();
                let exit = results.out_state(id).map(&describe).unwrap_or_default();
                (node.label(), NodeFacts { entry, exit })
            })
            .collect();

        Self {
            kind,
            edges: cfg.edges(),
            facts,
            passes: results.passes(),
            warnings: results.warnings().to_vec(),
        }
    }

    /// Returns the analysis that produced the report.
    #[must_use]
    pub const fn kind(&self) -> AnalysisKind {
        self.kind
    }

    /// Returns the control flow edges, in depth-first order from the entry.
    #[must_use]
    pub fn edges(&self) -> &[(Label, Label)] {
        &self.edges
    }

    /// Returns the entry and exit facts of the node labelled `label`.
    #[must_use]
    pub fn facts(&self, label: Label) -> Option<&NodeFacts> {
        self.facts.get(&label)
    }

    /// Returns the facts holding when control enters the node labelled `label`.
    #[must_use]
    pub fn entry(&self, label: Label) -> Option<&[Fact]> {
        self.facts.get(&label).map(|f| f.entry.as_slice())
    }

    /// Returns the facts holding when control leaves the node labelled `label`.
    #[must_use]
    pub fn exit(&self, label: Label) -> Option<&[Fact]> {
        self.facts.get(&label).map(|f| f.exit.as_slice())
    }

    /// Iterates over all nodes in label order, the exit last.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &NodeFacts)> + '_ {
        self.facts.iter().map(|(label, facts)| (*label, facts))
    }

    /// Returns the number of solver passes.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Returns the warnings raised while solving.
    #[must_use]
    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.warnings
    }
}

fn write_set(f: &mut fmt::Formatter<'_>, facts: &[Fact]) -> fmt::Result {
    f.write_str("{")?;
    for (i, fact) in facts.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{fact}")?;
    }
    f.write_str("}")
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} passes)", self.kind, self.passes)?;

        f.write_str("edges:")?;
        for (from, to) in &self.edges {
            write!(f, " ({from}, {to})")?;
        }
        writeln!(f)?;

        for (label, facts) in &self.facts {
            write!(f, "{:>5}  entry ", label.to_string())?;
            write_set(f, &facts.entry)?;
            f.write_str("  exit ")?;
            write_set(f, &facts.exit)?;
            writeln!(f)?;
        }

        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}
