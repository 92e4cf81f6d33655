//! Shared infrastructure used by the control flow graph and the data flow solver.
//!
//! - [`BitSet`] - dense sets of small integers, the storage behind every analysis lattice
//! - [`graph`] - a generic directed graph with strongly-typed node and edge identifiers

mod bitset;
pub mod graph;

pub use bitset::{BitSet, BitSetIter};
