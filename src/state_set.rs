//! Sets of model states.
//!
//! States are identified by their index in the [`Model`](crate::model::Model), so a SAT set is
//! a bit set over the fixed universe `0..n`. Bits at or beyond `n` are always clear, which keeps
//! equality a plain word comparison.

use std::fmt;

/// A bit set over the state indices `0..universe`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StateSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of states in the universe
    universe: usize,
}

impl StateSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    fn num_words(universe: usize) -> usize {
        universe.div_ceil(Self::BITS_PER_WORD)
    }

    /// Gets the word index and bit position for a given bit index.
    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// The empty set over `universe` states.
    pub fn empty(universe: usize) -> Self {
        Self {
            words: vec![0; Self::num_words(universe)],
            universe,
        }
    }

    /// The set of all `universe` states.
    pub fn full(universe: usize) -> Self {
        let mut set = Self {
            words: vec![u64::MAX; Self::num_words(universe)],
            universe,
        };
        set.clear_tail();
        set
    }

    pub fn from_indices(universe: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::empty(universe);
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Zeroes the bits past the universe in the last word.
    fn clear_tail(&mut self) {
        let used = self.universe % Self::BITS_PER_WORD;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }

    #[inline]
    pub fn universe(&self) -> usize {
        self.universe
    }

    /// Returns the number of states in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.universe {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        (self.words[word_idx] & (1u64 << bit_idx)) != 0
    }

    /// Adds a state. Returns true if it was not previously present.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the universe.
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.universe, "state {} out of universe 0..{}", index, self.universe);
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;
        self.words[word_idx] |= mask;
        was_clear
    }

    /// Removes a state. Returns true if it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.universe {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        let was_set = (self.words[word_idx] & mask) != 0;
        self.words[word_idx] &= !mask;
        was_set
    }

    fn zip_with(&self, other: &Self, op: impl Fn(u64, u64) -> u64) -> Self {
        assert_eq!(self.universe, other.universe, "state sets over different universes");
        let words = self.words.iter().zip(&other.words).map(|(&a, &b)| op(a, b)).collect();
        Self {
            words,
            universe: self.universe,
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & b)
    }

    /// `self − other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & !b)
    }

    /// All states of the universe not in `self`.
    pub fn complement(&self) -> Self {
        Self::full(self.universe).difference(self)
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.universe == other.universe && self.words.iter().zip(&other.words).all(|(&a, &b)| a & !b == 0)
    }

    /// Returns an iterator over the state indices in ascending order.
    pub fn iter(&self) -> StateSetIter<'_> {
        StateSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the indices in a [`StateSet`].
pub struct StateSetIter<'a> {
    set: &'a StateSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for StateSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(self.word_idx * StateSet::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = usize;
    type IntoIter = StateSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_empty_and_full() {
        let empty = StateSet::empty(70);
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let full = StateSet::full(70);
        assert_eq!(full.len(), 70);
        assert!(full.contains(69));
        assert!(!full.contains(70));
        assert_eq!(full.complement(), empty);
    }

    #[test]
    fn test_zero_universe() {
        let full = StateSet::full(0);
        assert!(full.is_empty());
        assert_eq!(full, StateSet::empty(0));
        assert_eq!(full.iter().count(), 0);
    }

    #[test]
    fn test_insert_remove() {
        let mut set = StateSet::empty(100);
        assert!(set.insert(42));
        assert!(!set.insert(42)); // Already set
        assert!(set.contains(42));
        assert!(set.remove(42));
        assert!(!set.remove(42));
        assert!(!set.remove(1000));
    }

    #[test]
    #[should_panic]
    fn test_insert_out_of_universe() {
        StateSet::empty(3).insert(3);
    }

    #[test]
    fn test_set_algebra() {
        let a = StateSet::from_indices(130, [1, 5, 64, 129]);
        let b = StateSet::from_indices(130, [5, 64, 100]);
        assert_eq!(a.union(&b).iter().collect::<Vec<_>>(), vec![1, 5, 64, 100, 129]);
        assert_eq!(a.intersection(&b).iter().collect::<Vec<_>>(), vec![5, 64]);
        assert_eq!(a.difference(&b).iter().collect::<Vec<_>>(), vec![1, 129]);
        assert_eq!(a.complement().len(), 126);
        assert!(a.intersection(&b).is_subset(&a));
        assert!(!a.is_subset(&b));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = StateSet::from_indices(10, [3, 1, 2]);
        let b = StateSet::from_indices(10, [1, 2, 3]);
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), "{1, 2, 3}");
    }
}
