//! Node identifier for directed graphs.

use std::fmt;

/// A strongly-typed identifier for nodes within a [`DirectedGraph`](super::DirectedGraph).
///
/// Node IDs are assigned sequentially from 0 as nodes are added, so they can
/// index per-node vectors directly (the data flow solver stores its entry and
/// exit states this way).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    ///
    /// Normal usage obtains IDs from [`DirectedGraph::add_node`](super::DirectedGraph::add_node).
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw 0-based index of this node.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_roundtrip_and_format() {
        let node = NodeId::from(7);
        assert_eq!(node.index(), 7);
        assert_eq!(usize::from(node), 7);
        assert_eq!(format!("{node}"), "n7");
        assert_eq!(format!("{node:?}"), "NodeId(7)");
        assert!(NodeId::new(1) < NodeId::new(2));
    }
}
