//! Lattice traits for data flow analysis.
//!
//! A lattice is a mathematical structure that defines how abstract values
//! combine at control flow join points. This module provides the fundamental
//! traits that analysis domains must implement.
//!
//! # Lattice Theory Background
//!
//! For data flow analysis, we use lattices with the following properties:
//!
//! - **Partial Order**: Elements can be compared (⊑)
//! - **Meet (∧)**: Greatest lower bound of two elements
//! - **Join (∨)**: Least upper bound of two elements
//! - **Top (⊤)**: Greatest element, the identity of meet
//! - **Bottom (⊥)**: Least element, absorbing for meet
//!
//! All domains in this crate are subsets of a finite universe. A *must*
//! analysis (available expressions) meets by intersection, so ⊤ is the full
//! universe; a *may* analysis (reaching definitions, liveness) meets by union,
//! so ⊤ is the empty set. Either way the solver starts interior nodes at ⊤
//! and states only move down the lattice, which bounds the number of passes
//! by the universe size.

use std::fmt::Debug;

use crate::utils::BitSet;

/// A meet semi-lattice with a meet (greatest lower bound) operation.
///
/// The meet operation combines information from multiple control flow paths.
/// It must satisfy:
///
/// - **Idempotent**: `x.meet(x) = x`
/// - **Commutative**: `x.meet(y) = y.meet(x)`
/// - **Associative**: `x.meet(y.meet(z)) = (x.meet(y)).meet(z)`
///
/// # Examples
///
/// ```rust
/// use whileflow::{analysis::dataflow::MeetSemiLattice, utils::BitSet};
///
/// // Bit sets are may-sets: meet is union.
/// let a = BitSet::from_indices(4, [0, 1]);
/// let b = BitSet::from_indices(4, [1, 2]);
/// assert_eq!(a.meet(&b), BitSet::from_indices(4, [0, 1, 2]));
/// ```
pub trait MeetSemiLattice: Clone + Debug + PartialEq {
    /// Computes the meet (greatest lower bound) of two lattice elements.
    ///
    /// The meet represents combining information from two paths that merge.
    #[must_use]
    fn meet(&self, other: &Self) -> Self;

    /// Returns `true` if this is the bottom element.
    ///
    /// Once bottom is reached, further meets cannot change the value.
    fn is_bottom(&self) -> bool;
}

/// A join semi-lattice with a join (least upper bound) operation.
///
/// It must satisfy:
///
/// - **Idempotent**: `x.join(x) = x`
/// - **Commutative**: `x.join(y) = y.join(x)`
/// - **Associative**: `x.join(y.join(z)) = (x.join(y)).join(z)`
pub trait JoinSemiLattice: Clone + Debug + PartialEq {
    /// Computes the join (least upper bound) of two lattice elements.
    #[must_use]
    fn join(&self, other: &Self) -> Self;

    /// Returns `true` if this is the top element.
    ///
    /// The top element is the identity for meet: `x.meet(top) = x`.
    fn is_top(&self) -> bool;
}

/// A complete lattice with both meet and join operations.
///
/// Set domains are sized by their universe, so the extremal elements are
/// obtained from an existing element rather than out of thin air.
///
/// # Required Properties
///
/// - All properties of `MeetSemiLattice` and `JoinSemiLattice`
/// - **Absorption**: `x.meet(x.join(y)) = x` and `x.join(x.meet(y)) = x`
pub trait Lattice: MeetSemiLattice + JoinSemiLattice {
    /// Returns the top (⊤) element of the lattice `self` belongs to.
    #[must_use]
    fn top_of(&self) -> Self;

    /// Returns the bottom (⊥) element of the lattice `self` belongs to.
    #[must_use]
    fn bottom_of(&self) -> Self;

    /// Returns `true` if `self ⊑ other` in the lattice order.
    fn leq(&self, other: &Self) -> bool {
        self.meet(other) == *self
    }
}

// Bit sets on their own are may-sets: meet is union, so ⊤ is empty.

impl MeetSemiLattice for BitSet {
    fn meet(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    fn is_bottom(&self) -> bool {
        self.is_full()
    }
}

impl JoinSemiLattice for BitSet {
    fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    fn is_top(&self) -> bool {
        self.is_empty()
    }
}

impl Lattice for BitSet {
    fn top_of(&self) -> Self {
        BitSet::new(self.len())
    }

    fn bottom_of(&self) -> Self {
        BitSet::full(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_is_may_lattice() {
        let a = BitSet::from_indices(8, [1, 3]);
        let b = BitSet::from_indices(8, [3, 5]);

        assert_eq!(a.meet(&b), BitSet::from_indices(8, [1, 3, 5]));
        assert_eq!(a.join(&b), BitSet::from_indices(8, [3]));
        assert!(a.top_of().is_top());
        assert!(a.bottom_of().is_bottom());
    }

    #[test]
    fn test_leq_follows_meet() {
        let small = BitSet::from_indices(4, [0]);
        let large = BitSet::from_indices(4, [0, 2]);

        // More definitions is lower in a may-lattice.
        assert!(large.leq(&small));
        assert!(!small.leq(&large));
        assert!(small.leq(&small));
        assert!(small.bottom_of().leq(&small));
        assert!(small.leq(&small.top_of()));
    }
}
