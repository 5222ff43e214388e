//! Exhaustive one-vertex extension search.
//!
//! A run goes through four phases:
//! 1. find every monochromatic \((K-1)\)-clique of the base graph;
//! 2. turn each into a constraint on the new vertex's row;
//! 3. prune the universe of low-order rows (the first `B` bits) with every
//!    constraint that fits in `B` bits, then freeze it;
//! 4. walk every full row, high bits `B..N` by binary counting on the outside
//!    and surviving low rows on the inside, checking all constraints.
//!
//! Rows are visited in increasing numeric order, so the reported extension is
//! the smallest valid row.

use crate::clique::find_monochromatic_cliques;
use crate::config::{ConfigError, ExtendConfig};
use crate::constraint::ConstraintSet;
use crate::filter::{FilterReport, PermutationFilter};
use crate::graph::{ColorMatrix, MatrixError};
use crate::universe::{FrozenUniverse, PermutationUniverse, UniverseError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, trace};

// ============================================================================
// Results
// ============================================================================

/// A successful extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension {
    /// Bit `i` is the color of the edge between the new vertex and vertex `i`.
    pub row: u64,
    /// The extended, symmetric matrix of order `N + 1`.
    pub matrix: ColorMatrix,
}

/// Terminal state of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A row creating no monochromatic clique was found.
    Found(Extension),
    /// Every row was examined; no extension exists.
    Exhausted,
    /// The outer-step cap was hit before the space was exhausted.
    CapReached,
}

impl SearchOutcome {
    /// Returns the extension, if one was found.
    pub fn extension(&self) -> Option<&Extension> {
        match self {
            SearchOutcome::Found(ext) => Some(ext),
            _ => None,
        }
    }
}

/// Deepest constraint index reached by a failing candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DeepestRecord {
    /// Index of the first violated constraint.
    pub constraint_index: usize,
    /// Candidate that got that far.
    pub row: u64,
}

/// Counters collected during a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Base order `N`.
    pub order: usize,
    /// Clique size `K` avoided.
    pub clique_size: usize,
    /// Effective filter width `min(B, N)`.
    pub filter_width: u32,
    /// Monochromatic \((K-1)\)-cliques in the base graph.
    pub cliques_found: usize,
    /// Constraints applied to the universe.
    pub filterable_constraints: usize,
    /// Constraints only checked during enumeration.
    pub deferred_constraints: usize,
    /// Universe filtering summary.
    pub filter: FilterReport,
    /// High-bit patterns visited.
    pub outer_steps: u64,
    /// Full rows checked against the constraint list.
    pub candidates_tested: u64,
    /// Deepest failure, when tracked.
    pub deepest: Option<DeepestRecord>,
}

/// Outcome plus statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport {
    /// How the search ended.
    pub outcome: SearchOutcome,
    /// What it took to get there.
    pub stats: SearchStats,
}

/// Errors that abort a search before or during setup.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Universe construction failed.
    #[error(transparent)]
    Universe(#[from] UniverseError),
    /// Matrix could not be extended.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

// ============================================================================
// SearchContext
// ============================================================================

/// All state owned by one search run.
#[derive(Debug)]
pub struct SearchContext<'a> {
    base: &'a ColorMatrix,
    config: &'a ExtendConfig,
    constraints: ConstraintSet,
    width: u32,
    stats: SearchStats,
}

impl<'a> SearchContext<'a> {
    /// Validates `config` and derives the constraint set of `base`.
    ///
    /// # Errors
    /// Returns [`SearchError::Config`] if the configuration does not fit `base`.
    pub fn new(base: &'a ColorMatrix, config: &'a ExtendConfig) -> Result<Self, SearchError> {
        let order = base.order();
        config.validate(order)?;
        let width = config.effective_width(order);

        let cliques = find_monochromatic_cliques(base, config.clique_size - 1);
        let constraints = ConstraintSet::from_cliques(&cliques, width);

        let stats = SearchStats {
            order,
            clique_size: config.clique_size,
            filter_width: width,
            cliques_found: cliques.len(),
            filterable_constraints: constraints.filterable_count(),
            deferred_constraints: constraints.deferred_count(),
            ..SearchStats::default()
        };
        info!(
            cliques = stats.cliques_found,
            size = config.clique_size - 1,
            filterable = stats.filterable_constraints,
            deferred = stats.deferred_constraints,
            "found monochromatic cliques"
        );

        Ok(Self {
            base,
            config,
            constraints,
            width,
            stats,
        })
    }

    /// Builds, filters and freezes the low-row universe.
    ///
    /// # Errors
    /// Returns [`SearchError::Universe`] if the universe cannot be allocated.
    pub fn build_universe(&mut self) -> Result<FrozenUniverse, SearchError> {
        let mut universe = PermutationUniverse::new(self.width)?;
        let report = PermutationFilter::from_config(self.config).run(&mut universe, &self.constraints);
        info!(
            initial = report.initial,
            surviving = report.surviving,
            pruned = format_args!("{:.2}%", report.pruned_percent()),
            "filtered candidate universe"
        );
        self.stats.filter = report;
        Ok(universe.freeze())
    }

    /// Walks every full row built from `lows` and the high-bit counter.
    ///
    /// # Errors
    /// Returns [`SearchError::Matrix`] if the extended matrix cannot be built.
    pub fn enumerate(&mut self, lows: &FrozenUniverse) -> Result<SearchOutcome, SearchError> {
        let order = self.base.order();
        if lows.is_empty() {
            info!("every low-order row violates a constraint");
            return Ok(SearchOutcome::Exhausted);
        }

        let mut high = 0u64;
        loop {
            if let Some(cap) = self.config.max_outer_steps {
                if self.stats.outer_steps >= cap {
                    info!(cap, "outer step cap reached");
                    return Ok(SearchOutcome::CapReached);
                }
            }
            self.stats.outer_steps += 1;

            for &low in lows.as_slice() {
                let row = high | u64::from(low);
                self.stats.candidates_tested += 1;
                if self.config.show_candidates {
                    trace!(row = %row_string(row, order), "candidate");
                }

                match self.constraints.first_violation(row) {
                    None => {
                        let mut matrix = self.base.expand()?;
                        matrix.set_vertex_row(order, row);
                        return Ok(SearchOutcome::Found(Extension { row, matrix }));
                    }
                    Some(idx) if self.config.track_deepest => self.record_depth(idx, row),
                    Some(_) => {}
                }
            }

            match next_high(high, self.width, order as u32) {
                Some(next) => high = next,
                None => return Ok(SearchOutcome::Exhausted),
            }
        }
    }

    fn record_depth(&mut self, idx: usize, row: u64) {
        let deeper = self
            .stats
            .deepest
            .map_or(true, |d| idx > d.constraint_index);
        if deeper {
            self.stats.deepest = Some(DeepestRecord {
                constraint_index: idx,
                row,
            });
            debug!(
                depth = idx,
                row = %row_string(row, self.base.order()),
                "new deepest partial match"
            );
        }
    }

    /// Runs the full search and returns the outcome with statistics.
    ///
    /// # Errors
    /// Returns an error only for setup failures; exhaustion is an outcome.
    pub fn run(mut self) -> Result<SearchReport, SearchError> {
        let lows = self.build_universe()?;
        let outcome = self.enumerate(&lows)?;
        drop(lows);

        match &outcome {
            SearchOutcome::Found(ext) => info!(
                row = %row_string(ext.row, self.base.order()),
                candidates = self.stats.candidates_tested,
                "found clique-free extension"
            ),
            SearchOutcome::Exhausted => info!(
                candidates = self.stats.candidates_tested,
                "exhausted possibilities"
            ),
            SearchOutcome::CapReached => info!(
                candidates = self.stats.candidates_tested,
                outer_steps = self.stats.outer_steps,
                "search truncated by outer step cap"
            ),
        }

        Ok(SearchReport {
            outcome,
            stats: self.stats,
        })
    }
}

/// Searches for a one-vertex extension of `base` with no monochromatic
/// `config.clique_size`-clique.
///
/// # Errors
/// Returns an error on invalid configuration or allocation failure.
pub fn run_extension_search(
    base: &ColorMatrix,
    config: &ExtendConfig,
) -> Result<SearchReport, SearchError> {
    SearchContext::new(base, config)?.run()
}

// ============================================================================
// Helpers
// ============================================================================

/// Binary increment over bit positions `from..to` of `high`.
///
/// Trailing ones are cleared and the next zero is set; returns `None` once
/// every position is one.
#[inline]
fn next_high(mut high: u64, from: u32, to: u32) -> Option<u64> {
    let mut i = from;
    while i < to && (high >> i) & 1 == 1 {
        high &= !(1u64 << i);
        i += 1;
    }
    if i >= to {
        return None;
    }
    Some(high | (1u64 << i))
}

/// Renders `row` most significant bit first, `len` digits.
pub fn row_string(row: u64, len: usize) -> String {
    (0..len)
        .rev()
        .map(|i| if (row >> i) & 1 == 1 { '1' } else { '0' })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
