//! A bit vector for set operations over dense indices.
//!
//! Every data flow lattice in this crate is a set drawn from a finite universe
//! that is known before solving: the binary expressions of a program, its
//! assignment nodes, or its variables. Each universe is numbered densely, so a
//! state can be stored as one bit per universe element.
//!
//! # Example
//!
//! ```rust
//! use whileflow::utils::BitSet;
//!
//! let mut available = BitSet::new(4);
//! available.insert(0);
//! available.insert(3);
//!
//! let mut killed = BitSet::new(4);
//! killed.insert(3);
//!
//! available.difference_with(&killed);
//! assert_eq!(available.iter().collect::<Vec<_>>(), vec![0]);
//! ```

use std::fmt;

const WORD_BITS: usize = 64;

/// A fixed-capacity set of indices in `0..len`.
///
/// Two bit sets can only be combined when they were created for the same
/// universe size; mixing sizes is a programming error and panics.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
    /// The bits, stored as a vector of words.
    words: Vec<u64>,
    /// The size of the universe.
    len: usize,
}

impl BitSet {
    /// Creates an empty set over a universe of `capacity` elements.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            len: capacity,
        }
    }

    /// Creates a set containing every element of a universe of `capacity` elements.
    #[must_use]
    pub fn full(capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        set.fill();
        set
    }

    /// Creates a set over `capacity` elements from the given indices.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= capacity`.
    #[must_use]
    pub fn from_indices(capacity: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(capacity);
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Returns the size of the universe this set was created for.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no element is in the set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns `true` if every element of the universe is in the set.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count() == self.len
    }

    /// Adds `index` to the set. Returns `true` if it was not present before.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.len, "index {index} out of bounds for {}", self.len);
        let mask = 1u64 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        let added = *word & mask == 0;
        *word |= mask;
        added
    }

    /// Returns `true` if `index` is in the set. Out-of-universe indices are never contained.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Adds every element of the universe.
    pub fn fill(&mut self) {
        self.words.iter_mut().for_each(|w| *w = u64::MAX);
        let tail = self.len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
    }

    /// In-place union. Returns `true` if `self` changed.
    pub fn union_with(&mut self, other: &Self) -> bool {
        self.combine(other, |a, b| a | b)
    }

    /// In-place intersection. Returns `true` if `self` changed.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        self.combine(other, |a, b| a & b)
    }

    /// In-place difference (`self \ other`). Returns `true` if `self` changed.
    pub fn difference_with(&mut self, other: &Self) -> bool {
        self.combine(other, |a, b| a & !b)
    }

    /// Returns `true` if every element of `self` is also in `other`.
    ///
    /// # Panics
    ///
    /// Panics if the two sets were created for different universe sizes.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    /// Returns an iterator over the elements in ascending order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            set: self,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn combine(&mut self, other: &Self, op: impl Fn(u64, u64) -> u64) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        let mut changed = false;
        for (a, &b) in self.words.iter_mut().zip(&other.words) {
            let old = *a;
            *a = op(old, b);
            changed |= old != *a;
        }
        changed
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = BitSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`BitSet`], in ascending order.
pub struct BitSetIter<'a> {
    set: &'a BitSet,
    word_idx: usize,
    /// Bits of the current word not yet yielded.
    current: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }
            self.word_idx += 1;
            self.current = *self.set.words.get(self.word_idx)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_insert_contains() {
        let mut bs = BitSet::new(70);
        assert!(bs.is_empty());

        assert!(bs.insert(0));
        assert!(bs.insert(64));
        assert!(!bs.insert(64));
        assert_eq!(bs.count(), 2);
        assert!(bs.contains(64));
        assert!(!bs.contains(63));
        assert!(!bs.contains(1000));
        assert_eq!(bs.iter().collect::<Vec<_>>(), vec![0, 64]);
    }

    #[test]
    fn test_bitset_full_masks_tail() {
        let bs = BitSet::full(70);
        assert_eq!(bs.count(), 70);
        assert!(bs.is_full());
        assert_eq!(bs.iter().last(), Some(69));

        let empty_universe = BitSet::full(0);
        assert!(empty_universe.is_empty());
        assert!(empty_universe.is_full());
    }

    #[test]
    fn test_bitset_set_operations_report_change() {
        let mut a = BitSet::from_indices(10, [0, 1, 2]);
        let b = BitSet::from_indices(10, [1, 2, 3]);

        let mut union = a.clone();
        assert!(union.union_with(&b));
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(!union.union_with(&b));

        assert!(a.intersect_with(&b));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert!(!a.intersect_with(&b));

        assert!(a.difference_with(&BitSet::from_indices(10, [2])));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_bitset_subset() {
        let small = BitSet::from_indices(130, [3, 128]);
        let big = BitSet::from_indices(130, [3, 64, 128]);
        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(BitSet::new(130).is_subset(&small));
    }

    #[test]
    fn test_bitset_iter_across_words() {
        let bs = BitSet::from_indices(200, [199, 5, 64, 63]);
        assert_eq!(bs.iter().collect::<Vec<_>>(), vec![5, 63, 64, 199]);
        assert_eq!(format!("{bs:?}"), "{5, 63, 64, 199}");
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_bitset_mismatched_universe_panics() {
        let mut a = BitSet::new(4);
        a.union_with(&BitSet::new(5));
    }
}
