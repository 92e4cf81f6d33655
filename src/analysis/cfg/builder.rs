//! Construction of control flow graphs from statement trees.
//!
//! The builder walks the statement tree once. Each statement is turned into a
//! fragment: the node control enters first, plus the pending exits whose
//! outgoing edge is not known yet. Enclosing statements link pending exits to
//! whatever runs next; loops close their own back edges, so no state outlives
//! the statement that created it.

use tracing::debug;

use crate::{
    analysis::cfg::{CfgEdgeKind, CfgNode, ControlFlowGraph, Label, NodePayload},
    syntax::{Expression, Statement},
    utils::graph::{DirectedGraph, NodeId},
    BlockKind, Error, Result,
};

/// Hands out statement labels for one build.
#[derive(Debug, Default)]
struct LabelAllocator {
    issued: u32,
}

impl LabelAllocator {
    fn fresh(&mut self) -> Result<Label> {
        self.issued = self
            .issued
            .checked_add(1)
            .ok_or_else(|| Error::GraphError("label space exhausted".to_string()))?;
        Ok(Label::Stmt(self.issued))
    }
}

/// A built statement awaiting its successor.
struct Fragment {
    /// The node control enters first
    root: NodeId,
    /// Nodes whose next edge is added by the enclosing statement, with the kind
    /// of that edge
    exits: Vec<(NodeId, CfgEdgeKind)>,
}

/// Builds a [`ControlFlowGraph`] from a [`Statement`].
///
/// Labels are assigned in pre-order: a test is labelled before the statements
/// it guards, and statements of a sequence in program order. Every build
/// starts numbering at 1, so building the same program twice produces
/// identical graphs.
///
/// # Examples
///
/// ```rust
/// use whileflow::{
///     analysis::{CfgBuilder, Label},
///     syntax::{Expression, Statement},
/// };
///
/// let program = Statement::sequence(vec![
///     Statement::assign("x", Expression::constant(1)),
///     Statement::skip(),
/// ]);
/// let cfg = CfgBuilder::build(&program)?;
///
/// assert_eq!(cfg.node_count(), 3);
/// assert_eq!(cfg.exit_labels(), &[Label::Stmt(2)]);
/// # Ok::<(), whileflow::Error>(())
/// ```
#[derive(Debug)]
pub struct CfgBuilder {
    graph: DirectedGraph<CfgNode, CfgEdgeKind>,
    labels: LabelAllocator,
}

impl CfgBuilder {
    /// Builds the control flow graph of `program`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyBlock`] if a sequence, loop body or branch has no statements
    /// - [`Error::InvalidProgram`] if a variable has an empty name
    /// - [`Error::GraphError`] if the program has more than `u32::MAX` statements
    ///
    /// No graph is returned when construction fails.
    pub fn build(program: &Statement) -> Result<ControlFlowGraph> {
        let capacity = program.label_count() + 1;
        let mut builder = CfgBuilder {
            graph: DirectedGraph::with_capacity(capacity, capacity + capacity / 2),
            labels: LabelAllocator::default(),
        };

        let fragment = builder.statement(program, BlockKind::Sequence)?;
        let exit = builder
            .graph
            .add_node(CfgNode::new(Label::Exit, NodePayload::Exit));
        builder.link(&fragment.exits, exit, None)?;

        let cfg = ControlFlowGraph::new(builder.graph, fragment.root, exit);
        debug!(
            nodes = cfg.node_count(),
            edges = cfg.edge_count(),
            "built control flow graph"
        );
        Ok(cfg)
    }

    /// Builds one statement. `block` names the enclosing construct, reported if
    /// the statement turns out to be an empty block.
    fn statement(&mut self, stmt: &Statement, block: BlockKind) -> Result<Fragment> {
        stmt.validate_shallow()?;

        match stmt {
            Statement::Skip => self.elementary(NodePayload::Skip),
            Statement::Assignment {
                variable,
                expression,
            } => self.elementary(NodePayload::Assignment {
                variable: variable.clone(),
                expression: expression.clone(),
            }),
            Statement::CompoundStatement(statements) => self.sequence(statements, block),
            Statement::WhileLoop { condition, body } => self.while_loop(condition, body),
            Statement::IfThenElse {
                condition,
                true_branch,
                false_branch,
            } => self.if_then_else(condition, true_branch, false_branch),
        }
    }

    fn elementary(&mut self, payload: NodePayload) -> Result<Fragment> {
        let node = self.node(payload)?;
        Ok(Fragment {
            root: node,
            exits: vec![(node, CfgEdgeKind::Sequential)],
        })
    }

    fn sequence(&mut self, statements: &[Statement], block: BlockKind) -> Result<Fragment> {
        let mut iter = statements.iter();
        let Some(first) = iter.next() else {
            return Err(Error::EmptyBlock { block });
        };

        let head = self.statement(first, BlockKind::Sequence)?;
        let mut exits = head.exits;
        for stmt in iter {
            let next = self.statement(stmt, BlockKind::Sequence)?;
            self.link(&exits, next.root, None)?;
            exits = next.exits;
        }

        Ok(Fragment {
            root: head.root,
            exits,
        })
    }

    fn while_loop(&mut self, condition: &Expression, body: &Statement) -> Result<Fragment> {
        let test = self.node(NodePayload::Condition(condition.clone()))?;
        let body = self.statement(body, BlockKind::LoopBody)?;

        self.graph
            .add_edge(test, body.root, CfgEdgeKind::ConditionalTrue)?;
        self.link(&body.exits, test, Some(CfgEdgeKind::BackEdge))?;

        Ok(Fragment {
            root: test,
            exits: vec![(test, CfgEdgeKind::ConditionalFalse)],
        })
    }

    fn if_then_else(
        &mut self,
        condition: &Expression,
        true_branch: &Statement,
        false_branch: &Statement,
    ) -> Result<Fragment> {
        let test = self.node(NodePayload::Condition(condition.clone()))?;
        let then_part = self.statement(true_branch, BlockKind::TrueBranch)?;
        let else_part = self.statement(false_branch, BlockKind::FalseBranch)?;

        self.graph
            .add_edge(test, then_part.root, CfgEdgeKind::ConditionalTrue)?;
        self.graph
            .add_edge(test, else_part.root, CfgEdgeKind::ConditionalFalse)?;

        let mut exits = then_part.exits;
        exits.extend(else_part.exits);
        Ok(Fragment { root: test, exits })
    }

    fn node(&mut self, payload: NodePayload) -> Result<NodeId> {
        let label = self.labels.fresh()?;
        Ok(self.graph.add_node(CfgNode::new(label, payload)))
    }

    /// Links pending exits to `target`, with their own edge kind unless `kind`
    /// overrides it.
    fn link(
        &mut self,
        exits: &[(NodeId, CfgEdgeKind)],
        target: NodeId,
        kind: Option<CfgEdgeKind>,
    ) -> Result<()> {
        for &(source, pending) in exits {
            self.graph
                .add_edge(source, target, kind.unwrap_or(pending))?;
        }
        Ok(())
    }
}
