//! Enumeration of monochromatic cliques in a [`ColorMatrix`].
//!
//! Every `n`-subset is visited once in lexicographic order and kept iff all of
//! its \(\binom{n}{2}\) edges share one color. The pairwise check bails out at
//! the first mismatching edge, so non-cliques are usually rejected after a
//! handful of lookups.

use crate::combination::{first_combination, next_combination};
use crate::graph::{bit, Color, ColorMatrix};

// ============================================================================
// Clique
// ============================================================================

/// A monochromatic clique of the base graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Clique {
    members: Vec<usize>,
    color: Color,
    mask: u64,
}

impl Clique {
    /// Creates a clique from strictly increasing member indices.
    ///
    /// # Panics
    /// Panics in debug builds if the members are not strictly increasing or
    /// exceed 63.
    pub fn new(members: Vec<usize>, color: Color) -> Self {
        debug_assert!(members.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(members.iter().all(|&v| v < 64));
        let mask = members.iter().fold(0u64, |acc, &v| acc | bit(v));
        Self {
            members,
            color,
            mask,
        }
    }

    /// Member indices in increasing order.
    #[inline]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Color shared by every edge of the clique.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Bitset of the members.
    #[inline]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` for the empty clique.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the member mask iff every member is below `width`.
    #[inline]
    pub fn filter_mask(&self, width: u32) -> Option<u64> {
        if width >= 64 || self.mask >> width == 0 {
            Some(self.mask)
        } else {
            None
        }
    }
}

// ============================================================================
// Finder
// ============================================================================

/// Returns the shared color of the edges among `members`, or `None` at the
/// first edge that disagrees.
///
/// Subsets with fewer than two members have no edges and yield `None`.
#[inline]
pub fn monochromatic_color(matrix: &ColorMatrix, members: &[usize]) -> Option<Color> {
    if members.len() < 2 {
        return None;
    }
    let cc = matrix.color(members[0], members[1]);
    let want = if cc == Color::Blue { u64::MAX } else { 0 };

    let mut mask = 0u64;
    for &v in members {
        mask |= bit(v);
    }
    for &v in members {
        let others = mask & !bit(v);
        if (matrix.row(v) ^ want) & others != 0 {
            return None;
        }
    }
    Some(cc)
}

/// Lazy, single-pass enumeration of the monochromatic `n`-cliques.
#[derive(Clone, Debug)]
pub struct MonochromaticCliques<'a> {
    matrix: &'a ColorMatrix,
    state: Option<Vec<usize>>,
    started: bool,
}

impl<'a> MonochromaticCliques<'a> {
    /// Starts an enumeration of monochromatic `n`-cliques of `matrix`.
    pub fn new(matrix: &'a ColorMatrix, n: usize) -> Self {
        let state = if n < 2 {
            None
        } else {
            first_combination(matrix.order(), n)
        };
        Self {
            matrix,
            state,
            started: false,
        }
    }
}

impl Iterator for MonochromaticCliques<'_> {
    type Item = Clique;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let state = self.state.as_mut()?;
            if self.started {
                if !next_combination(state) {
                    self.state = None;
                    return None;
                }
            } else {
                self.started = true;
            }
            let members = &state[..state.len() - 1];
            if let Some(color) = monochromatic_color(self.matrix, members) {
                return Some(Clique::new(members.to_vec(), color));
            }
        }
    }
}

impl std::iter::FusedIterator for MonochromaticCliques<'_> {}

/// Collects every monochromatic `n`-clique of `matrix`, in lexicographic order.
pub fn find_monochromatic_cliques(matrix: &ColorMatrix, n: usize) -> Vec<Clique> {
    MonochromaticCliques::new(matrix, n).collect()
}

// ============================================================================
// Tests
// ============================================================================
