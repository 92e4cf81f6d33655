//! Generic directed graph infrastructure.
//!
//! The control flow graph is a thin domain layer over [`DirectedGraph`]: nodes
//! and edges are stored in insertion order and addressed through the
//! strongly-typed [`NodeId`] and [`EdgeId`] identifiers. Adjacency lists keep
//! successors and predecessors in the order their edges were added, which the
//! CFG relies on for its deterministic edge enumeration.
//!
//! # Key Components
//!
//! - [`NodeId`] / [`EdgeId`] - newtype identifiers, never mixed with plain integers
//! - [`DirectedGraph`] - adjacency-list graph with typed node and edge data
//! - [`traversal`] - depth-first orders and reachability
//!
//! # Example
//!
//! ```rust
//! use whileflow::utils::graph::{traversal, DirectedGraph};
//!
//! let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
//! let a = graph.add_node("A");
//! let b = graph.add_node("B");
//! let c = graph.add_node("C");
//! graph.add_edge(a, b, ())?;
//! graph.add_edge(b, c, ())?;
//! graph.add_edge(c, b, ())?;
//!
//! assert_eq!(traversal::reverse_postorder(&graph, a), vec![a, b, c]);
//! # Ok::<(), whileflow::Error>(())
//! ```

mod directed;
mod edge;
mod node;
pub mod traversal;

pub use directed::DirectedGraph;
pub use edge::EdgeId;
pub use node::NodeId;
