//! The set of candidate low-order rows for the new vertex.
//!
//! A universe of width `B` starts as every `B`-bit value `0..2^B` and only ever
//! shrinks. Survivors are threaded on an index-linked list stored as parallel
//! `values`/`prev`/`next` arrays, so removal is an O(1) unlink and a scan only
//! touches live nodes. After many removals the live nodes are scattered;
//! [`PermutationUniverse::regroup`] packs them back into a dense prefix.
//!
//! Nodes are never inserted or reordered, so list order always equals
//! increasing slot order and increasing value order. Regrouping relies on
//! this to compact in place.

use std::iter::FusedIterator;
use thiserror::Error;

/// Sentinel link value.
const NIL: u32 = u32::MAX;

/// Widest universe supported; `2^31` slots keep every index below [`NIL`].
pub const MAX_FILTER_WIDTH: u32 = 31;

/// Errors raised while building a universe.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UniverseError {
    /// Requested width exceeds [`MAX_FILTER_WIDTH`].
    #[error("filter width {width} exceeds the supported maximum of {max}")]
    WidthTooLarge {
        /// Requested width.
        width: u32,
        /// Supported maximum.
        max: u32,
    },
    /// The backing arrays could not be allocated.
    #[error("could not allocate a universe of {elements} candidates")]
    Allocation {
        /// Number of elements requested.
        elements: usize,
    },
}

// ============================================================================
// PermutationUniverse
// ============================================================================

/// Shrinking set of `width`-bit candidate rows with O(1) removal.
#[derive(Clone, Debug)]
pub struct PermutationUniverse {
    width: u32,
    values: Vec<u32>,
    prev: Vec<u32>,
    next: Vec<u32>,
    head: u32,
    len: usize,
    regroups: usize,
}

impl PermutationUniverse {
    /// Builds the full universe `0..2^width`.
    ///
    /// # Errors
    /// Returns an error if `width` is too large or allocation fails.
    pub fn new(width: u32) -> Result<Self, UniverseError> {
        if width > MAX_FILTER_WIDTH {
            return Err(UniverseError::WidthTooLarge {
                width,
                max: MAX_FILTER_WIDTH,
            });
        }
        let size = 1usize << width;
        let values = alloc_with(size, |i| i as u32)?;
        let prev = alloc_with(size, |i| if i == 0 { NIL } else { (i - 1) as u32 })?;
        let next = alloc_with(size, |i| if i + 1 == size { NIL } else { (i + 1) as u32 })?;
        Ok(Self {
            width,
            values,
            prev,
            next,
            head: 0,
            len: size,
            regroups: 0,
        })
    }

    /// Bit width of every candidate.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of surviving candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` once every candidate has been removed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of physical slots, live or not.
    #[inline]
    pub fn slots(&self) -> usize {
        self.values.len()
    }

    /// How many times the universe has been regrouped.
    #[inline]
    pub fn regroups(&self) -> usize {
        self.regroups
    }

    /// Iterates the survivors in increasing order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            universe: self,
            cur: self.head,
            remaining: self.len,
        }
    }

    /// Unlinks slot `idx`.
    #[inline(always)]
    fn unlink(&mut self, idx: usize) {
        let p = self.prev[idx];
        let n = self.next[idx];
        if p == NIL {
            self.head = n;
        } else {
            self.next[p as usize] = n;
        }
        if n != NIL {
            self.prev[n as usize] = p;
        }
        self.len -= 1;
    }

    /// Removes every survivor for which `pred` returns `true`.
    ///
    /// Returns the number of removed candidates.
    pub fn remove_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(u32) -> bool,
    {
        let before = self.len;
        let mut cur = self.head;
        while cur != NIL {
            let idx = cur as usize;
            cur = self.next[idx];
            if pred(self.values[idx]) {
                self.unlink(idx);
            }
        }
        before - self.len
    }

    /// Packs the survivors into slots `0..len`, preserving order and membership.
    ///
    /// Storage beyond the survivors is released.
    pub fn regroup(&mut self) {
        let mut write = 0usize;
        let mut cur = self.head;
        while cur != NIL {
            let idx = cur as usize;
            debug_assert!(idx >= write, "list order diverged from slot order");
            cur = self.next[idx];
            self.values[write] = self.values[idx];
            write += 1;
        }
        debug_assert_eq!(write, self.len);

        self.values.truncate(write);
        self.prev.truncate(write);
        self.next.truncate(write);
        for i in 0..write {
            self.prev[i] = if i == 0 { NIL } else { (i - 1) as u32 };
            self.next[i] = if i + 1 == write { NIL } else { (i + 1) as u32 };
        }
        self.values.shrink_to_fit();
        self.prev.shrink_to_fit();
        self.next.shrink_to_fit();

        self.head = if write == 0 { NIL } else { 0 };
        self.regroups += 1;
    }

    /// Freezes the survivors into a flat, sorted sequence.
    pub fn freeze(mut self) -> FrozenUniverse {
        self.regroup();
        FrozenUniverse {
            values: self.values,
        }
    }
}

fn alloc_with(size: usize, f: impl Fn(usize) -> u32) -> Result<Vec<u32>, UniverseError> {
    let mut v = Vec::new();
    v.try_reserve_exact(size)
        .map_err(|_| UniverseError::Allocation { elements: size })?;
    v.extend((0..size).map(f));
    Ok(v)
}

/// Iterator over the survivors of a [`PermutationUniverse`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    universe: &'a PermutationUniverse,
    cur: u32,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.cur == NIL {
            return None;
        }
        let idx = self.cur as usize;
        self.cur = self.universe.next[idx];
        self.remaining -= 1;
        Some(self.universe.values[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PermutationUniverse {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// FrozenUniverse
// ============================================================================

/// The filtered survivors, in increasing order, ready for repeated scans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrozenUniverse {
    values: Vec<u32>,
}

impl FrozenUniverse {
    /// Number of candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no candidate survived.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Candidates as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use std::collections::BTreeSet;

    fn members(u: &PermutationUniverse) -> Vec<u32> {
        u.iter().collect()
    }

    #[test]
    fn new_universe_holds_every_value() {
        let u = PermutationUniverse::new(6).unwrap();
        assert_eq!(u.len(), 64);
        assert_eq!(members(&u), (0..64).collect::<Vec<u32>>());
        assert_eq!(u.iter().len(), 64);
    }

    #[test]
    fn zero_width_universe_is_a_single_row() {
        let u = PermutationUniverse::new(0).unwrap();
        assert_eq!(members(&u), vec![0]);
    }

    #[test]
    fn width_limit_is_enforced() {
        let err = PermutationUniverse::new(MAX_FILTER_WIDTH + 1).unwrap_err();
        assert_eq!(
            err,
            UniverseError::WidthTooLarge {
                width: 32,
                max: MAX_FILTER_WIDTH
            }
        );
    }

    #[test]
    fn remove_where_unlinks_head_middle_and_tail() {
        let mut u = PermutationUniverse::new(3).unwrap();
        let removed = u.remove_where(|v| v == 0 || v == 4 || v == 7);
        assert_eq!(removed, 3);
        assert_eq!(members(&u), vec![1, 2, 3, 5, 6]);
        assert_eq!(u.remove_where(|_| true), 5);
        assert!(u.is_empty());
        assert_eq!(u.iter().next(), None);
    }

    #[test]
    fn regroup_preserves_membership_and_order() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        let mut u = PermutationUniverse::new(12).unwrap();
        let mut model: BTreeSet<u32> = (0..1 << 12).collect();

        for round in 0..6 {
            let drop_mask: u32 = rng.random_range(1..1 << 12);
            u.remove_where(|v| v & drop_mask == drop_mask);
            model.retain(|&v| v & drop_mask != drop_mask);

            let before = members(&u);
            u.regroup();
            assert_eq!(members(&u), before, "round {round}");
            assert_eq!(u.slots(), u.len());
            assert_eq!(before, model.iter().copied().collect::<Vec<_>>());
        }
        assert_eq!(u.regroups(), 6);
    }

    #[test]
    fn regroup_is_safe_on_untouched_and_empty_universes() {
        let mut u = PermutationUniverse::new(4).unwrap();
        u.regroup();
        assert_eq!(members(&u), (0..16).collect::<Vec<u32>>());
        u.remove_where(|_| true);
        u.regroup();
        assert!(u.is_empty());
        assert_eq!(u.slots(), 0);
        u.regroup();
        assert!(members(&u).is_empty());
    }

    #[test]
    fn removal_after_regroup_keeps_links_consistent() {
        let mut u = PermutationUniverse::new(5).unwrap();
        u.remove_where(|v| v % 3 == 0);
        u.regroup();
        u.remove_where(|v| v % 2 == 0);
        let expected: Vec<u32> = (0..32).filter(|v| v % 3 != 0 && v % 2 != 0).collect();
        assert_eq!(members(&u), expected);
        u.regroup();
        assert_eq!(members(&u), expected);
    }

    #[test]
    fn freeze_yields_sorted_survivors() {
        let mut u = PermutationUniverse::new(8).unwrap();
        u.remove_where(|v| v.count_ones() % 2 == 1);
        let expected: Vec<u32> = (0..256).filter(|v: &u32| v.count_ones() % 2 == 0).collect();
        let frozen = u.freeze();
        assert_eq!(frozen.len(), expected.len());
        assert_eq!(frozen.as_slice(), expected.as_slice());
        assert_eq!(frozen.as_slice()[1], 3);
    }
}
