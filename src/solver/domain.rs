//! Compact representation of the admissible values of one variable.
//!
//! A [`Domain`] is a bitset over the variable's creation range `[lo, hi]`,
//! with cached bounds and cardinality. Mutation happens exclusively through
//! [`DomainStore`](crate::solver::store::DomainStore), which logs every
//! removed value on the trail so that backtracking can restore the exact
//! prior state in O(changes).

/// Signals that a mutation emptied a domain.
///
/// A wipeout is an ordinary search event, not a program error: the engine
/// recovers by undoing the trail and trying the next branch. It never
/// reaches the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wipeout;

/// The set of still-admissible integer values for one variable.
#[derive(Debug, Clone)]
pub(crate) struct Domain {
    /// Lower bound of the creation range; bit `i` of `words` stands for
    /// the value `base + i`.
    base: i64,
    words: Box<[u64]>,
    /// Current bounds; only meaningful while `size > 0`.
    lo: i64,
    hi: i64,
    size: u32,
}

impl Domain {
    /// Builds a full domain over `[lo, hi]`. The caller guarantees
    /// `lo <= hi` and a width within the model layer's cap; inverted or
    /// over-wide ranges are rejected before a domain ever exists.
    pub(crate) fn new(lo: i64, hi: i64) -> Self {
        let width = (hi - lo + 1) as usize;
        let word_count = width.div_ceil(64);
        let mut words = vec![u64::MAX; word_count].into_boxed_slice();
        let spare = word_count * 64 - width;
        if spare > 0 {
            words[word_count - 1] >>= spare;
        }
        Self {
            base: lo,
            words,
            lo,
            hi,
            size: width as u32,
        }
    }

    pub(crate) fn min(&self) -> i64 {
        self.lo
    }

    pub(crate) fn max(&self) -> i64 {
        self.hi
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.size == 1
    }

    /// The bound value, or `None` while more than one value remains.
    pub(crate) fn value(&self) -> Option<i64> {
        if self.is_bound() {
            Some(self.lo)
        } else {
            None
        }
    }

    pub(crate) fn contains(&self, v: i64) -> bool {
        if v < self.base || self.size == 0 || v < self.lo || v > self.hi {
            return false;
        }
        let idx = (v - self.base) as usize;
        self.words[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    /// Removes `v` if present, keeping the cached bounds tight.
    /// Returns whether the domain changed. Does not touch the trail.
    pub(crate) fn clear_value(&mut self, v: i64) -> bool {
        if !self.contains(v) {
            return false;
        }
        let idx = (v - self.base) as usize;
        self.words[idx / 64] &= !(1u64 << (idx % 64));
        self.size -= 1;
        if self.size == 0 {
            return true;
        }
        if v == self.lo {
            self.lo = self.next_at_or_above(v + 1);
        }
        if v == self.hi {
            self.hi = self.prev_at_or_below(v - 1);
        }
        true
    }

    /// Re-inserts a value removed earlier. Used only when unwinding the
    /// trail; the value is always within the creation range.
    pub(crate) fn insert_value(&mut self, v: i64) {
        let idx = (v - self.base) as usize;
        self.words[idx / 64] |= 1u64 << (idx % 64);
        if self.size == 0 {
            self.lo = v;
            self.hi = v;
        } else {
            self.lo = self.lo.min(v);
            self.hi = self.hi.max(v);
        }
        self.size += 1;
    }

    /// Ascending iteration over the remaining values.
    pub(crate) fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        let range = if self.size == 0 {
            1..=0
        } else {
            self.lo..=self.hi
        };
        range.filter(move |&v| self.contains(v))
    }

    fn next_at_or_above(&self, from: i64) -> i64 {
        let mut idx = (from - self.base) as usize;
        let width = self.words.len() * 64;
        while idx < width {
            let word = self.words[idx / 64] >> (idx % 64);
            if word != 0 {
                return self.base + idx as i64 + word.trailing_zeros() as i64;
            }
            idx = (idx / 64 + 1) * 64;
        }
        // Callers only scan after a removal that left the domain non-empty.
        unreachable!("no value at or above {from} in a non-empty domain")
    }

    fn prev_at_or_below(&self, from: i64) -> i64 {
        let mut idx = (from - self.base) as isize;
        while idx >= 0 {
            let shift = 63 - (idx % 64) as u32;
            let word = self.words[idx as usize / 64] << shift;
            if word != 0 {
                return self.base + idx as i64 - word.leading_zeros() as i64;
            }
            idx = (idx / 64) * 64 - 1;
        }
        unreachable!("no value at or below {from} in a non-empty domain")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_domain_covers_full_range() {
        let d = Domain::new(0, 3);
        assert_eq!(d.min(), 0);
        assert_eq!(d.max(), 3);
        assert_eq!(d.size(), 4);
        assert!(!d.is_bound());
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn removal_tightens_bounds() {
        let mut d = Domain::new(1, 5);
        assert!(d.clear_value(1));
        assert_eq!(d.min(), 2);
        assert!(d.clear_value(5));
        assert_eq!(d.max(), 4);
        assert!(!d.clear_value(5));
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn removal_of_interior_value_keeps_bounds() {
        let mut d = Domain::new(0, 4);
        assert!(d.clear_value(2));
        assert_eq!(d.min(), 0);
        assert_eq!(d.max(), 4);
        assert!(!d.contains(2));
        assert_eq!(d.size(), 4);
    }

    #[test]
    fn value_is_reported_only_when_bound() {
        let mut d = Domain::new(7, 8);
        assert_eq!(d.value(), None);
        assert!(d.clear_value(8));
        assert!(d.is_bound());
        assert_eq!(d.value(), Some(7));
    }

    #[test]
    fn insert_restores_removed_value_and_bounds() {
        let mut d = Domain::new(0, 3);
        d.clear_value(0);
        d.clear_value(3);
        d.insert_value(3);
        assert_eq!(d.max(), 3);
        d.insert_value(0);
        assert_eq!(d.min(), 0);
        assert_eq!(d.size(), 4);
    }

    #[test]
    fn wide_domains_cross_word_boundaries() {
        let mut d = Domain::new(0, 130);
        assert_eq!(d.size(), 131);
        assert!(d.contains(64));
        assert!(d.contains(128));
        for v in 0..130 {
            assert!(d.clear_value(v));
        }
        assert!(d.is_bound());
        assert_eq!(d.value(), Some(130));
    }

    #[test]
    fn bounds_rescan_across_emptied_words() {
        let mut d = Domain::new(0, 200);
        for v in (70..=200).rev() {
            assert!(d.clear_value(v));
        }
        assert_eq!(d.max(), 69);
        for v in 0..=60 {
            assert!(d.clear_value(v));
        }
        assert_eq!(d.min(), 61);
        assert_eq!(d.size(), 9);
    }

    #[test]
    fn negative_ranges_are_supported() {
        let mut d = Domain::new(-3, 2);
        assert!(d.contains(-3));
        assert!(d.clear_value(-3));
        assert_eq!(d.min(), -2);
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![-2, -1, 0, 1, 2]);
    }
}
