//! Constraints on the new vertex's row, one per monochromatic \((K-1)\)-clique.
//!
//! Adding a vertex to a \(K\)-clique-free coloring can only create a
//! monochromatic \(K\)-clique that consists of the new vertex plus an existing
//! monochromatic \((K-1)\)-clique of the same color. So a row `r` (bit `i` = color
//! of the edge to vertex `i`) is invalid iff, for some clique of color `cc`,
//! every masked bit of `r` equals `cc`.

use crate::clique::Clique;
use crate::graph::Color;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constraint
// ============================================================================

/// A `(mask, forbidden color)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Constraint {
    mask: u64,
    color: Color,
}

impl Constraint {
    /// Creates a constraint over the vertices in `mask`.
    #[inline]
    pub const fn new(mask: u64, color: Color) -> Self {
        Self { mask, color }
    }

    /// Derives the constraint guarding against `clique` plus the new vertex.
    #[inline]
    pub fn from_clique(clique: &Clique) -> Self {
        Self::new(clique.mask(), clique.color())
    }

    /// Member bitset.
    #[inline(always)]
    pub const fn mask(&self) -> u64 {
        self.mask
    }

    /// Color the new vertex must not use on every masked edge.
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns `true` iff every member lies below bit `width`.
    #[inline(always)]
    pub const fn is_filterable(&self, width: u32) -> bool {
        width >= 64 || self.mask >> width == 0
    }

    /// Returns `true` iff `row` colors every masked edge with the forbidden
    /// color, i.e. the new vertex would close a monochromatic clique.
    ///
    /// Red cliques flip the masked bits first, so in both cases the test is
    /// "all masked bits set".
    #[inline(always)]
    pub const fn completes_clique(&self, row: u64) -> bool {
        let flip = match self.color {
            Color::Red => self.mask,
            Color::Blue => 0,
        };
        ((row ^ flip) & self.mask) == self.mask
    }
}

// ============================================================================
// Filter ordering
// ============================================================================

/// Order in which filterable constraints are applied to the universe.
///
/// The surviving set is the same either way; only the shrink rate differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOrder {
    /// Lexicographic clique order.
    #[default]
    AsFound,
    /// Constraints on the least shared vertex positions first.
    LeastOverlapFirst,
}

// ============================================================================
// ConstraintSet
// ============================================================================

/// All constraints derived from one base graph.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    width: u32,
}

impl ConstraintSet {
    /// Derives one constraint per clique. `width` is the filterable bit width.
    pub fn from_cliques(cliques: &[Clique], width: u32) -> Self {
        Self {
            constraints: cliques.iter().map(Constraint::from_clique).collect(),
            width,
        }
    }

    /// Filterable bit width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of constraints.
    #[inline]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if there are no constraints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// All constraints in derivation order.
    #[inline]
    pub fn as_slice(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints that can be checked against the bounded universe.
    pub fn filterable(&self) -> impl Iterator<Item = &Constraint> + '_ {
        let width = self.width;
        self.constraints
            .iter()
            .filter(move |c| c.is_filterable(width))
    }

    /// Number of filterable constraints.
    pub fn filterable_count(&self) -> usize {
        self.filterable().count()
    }

    /// Number of constraints left to full verification.
    pub fn deferred_count(&self) -> usize {
        self.len() - self.filterable_count()
    }

    /// Filterable constraints in application order.
    pub fn ordered_for_filtering(&self, order: FilterOrder) -> Vec<Constraint> {
        let mut out: Vec<Constraint> = self.filterable().copied().collect();
        if order == FilterOrder::LeastOverlapFirst {
            let mut freq = [0u64; 64];
            for c in &out {
                let mut t = c.mask;
                while t != 0 {
                    freq[t.trailing_zeros() as usize] += 1;
                    t &= t - 1;
                }
            }
            out.sort_by_cached_key(|c| {
                let mut score = 0u64;
                let mut t = c.mask;
                while t != 0 {
                    score += freq[t.trailing_zeros() as usize];
                    t &= t - 1;
                }
                score
            });
        }
        out
    }

    /// Index of the first constraint (in derivation order) that `row` violates.
    #[inline]
    pub fn first_violation(&self, row: u64) -> Option<usize> {
        self.constraints.iter().position(|c| c.completes_clique(row))
    }
}

// ============================================================================
// Tests
// ============================================================================
